//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/votes", post(handlers::submit_vote))
        .route("/votes/status", get(handlers::vote_status))
        .route("/answers/:answer_id/accept", put(handlers::accept_answer))
        .route("/items/:item_kind/:item_id/tally", get(handlers::item_tally))
        .route("/reconcile", post(handlers::reconcile));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{AcceptResponse, ErrorResponse, TallyResponse, VoteResponse, VoteStatusResponse};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use ledger_application::{
        ContentStore, DynLedgerService, LedgerParams, LedgerService, RetryPolicy, VoteLedger,
    };
    use ledger_domain::{Answer, Question};
    use ledger_infrastructure::{DocumentStore, SeedData};
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> (Router, Arc<DocumentStore>) {
        let store = Arc::new(DocumentStore::in_memory());
        store
            .import(SeedData {
                questions: vec![Question::new("q1", "alice")],
                answers: vec![Answer::new("a1", "q1", "bob"), Answer::new("a2", "q1", "carol")],
                votes: Vec::new(),
            })
            .await
            .unwrap();
        let ledger: Arc<dyn VoteLedger> = store.clone();
        let content: Arc<dyn ContentStore> = store.clone();
        let service: DynLedgerService =
            LedgerService::new(ledger, content, LedgerParams::default().with_retry(RetryPolicy::none()));
        (create_router(AppState::new(Arc::new(service))), store)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn vote(user: &str, value: i64) -> Request<Body> {
        json_request(
            "POST",
            "/api/v1/votes",
            serde_json::json!({"userId": user, "itemId": "a1", "itemKind": "answer", "value": value}),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_vote_toggle_over_http() {
        let (app, _) = app().await;

        let response = app.clone().oneshot(vote("u1", 1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: VoteResponse = read(response).await;
        assert_eq!(body, VoteResponse { total_votes: 1, user_vote: 1 });

        let body: VoteResponse = read(app.clone().oneshot(vote("u1", 1)).await.unwrap()).await;
        assert_eq!(body, VoteResponse { total_votes: 0, user_vote: 0 });

        let body: VoteResponse = read(app.clone().oneshot(vote("u2", -1)).await.unwrap()).await;
        assert_eq!(body, VoteResponse { total_votes: -1, user_vote: -1 });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/votes/status?userId=u2&itemId=a1&itemKind=answer")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status: VoteStatusResponse = read(response).await;
        assert_eq!(status, VoteStatusResponse { user_vote: -1, total_votes: -1 });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/items/answer/a1/tally")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let tally: TallyResponse = read(response).await;
        assert_eq!((tally.upvotes, tally.downvotes, tally.total_votes), (0, 1, -1));
        assert_eq!(tally.stored_total, -1);
    }

    #[tokio::test]
    async fn test_tally_is_read_only() {
        let (app, store) = app().await;
        let mut drifted = Answer::new("a3", "q1", "dave");
        drifted.projection.votes = 7;
        store
            .import(SeedData {
                answers: vec![drifted],
                ..Default::default()
            })
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/items/answer/a3/tally")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let tally: TallyResponse = read(response).await;
        assert_eq!((tally.total_votes, tally.stored_total), (0, 7));

        let item = ledger_domain::ItemRef::answer("a3");
        assert_eq!(store.projected_total(&item).await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_vote_validation_errors() {
        let (app, store) = app().await;

        let response = app.clone().oneshot(vote("u1", 2)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read(response).await;
        assert_eq!(body.code, "INVALID_VOTE_VALUE");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/votes",
                serde_json::json!({"userId": "u1", "itemId": "a1", "itemKind": "comment", "value": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read(response).await;
        assert_eq!(body.code, "UNKNOWN_ITEM_KIND");

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/votes",
                serde_json::json!({"userId": "u1", "itemId": "zz", "itemKind": "answer", "value": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(store.tally(&ledger_domain::ItemRef::answer("a1")).await.unwrap().watermark, 0);
    }

    #[tokio::test]
    async fn test_accept_answer_over_http() {
        let (app, _) = app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/answers/a1/accept",
                serde_json::json!({"requestingUserId": "bob"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: ErrorResponse = read(response).await;
        assert_eq!(body.code, "NOT_AUTHORIZED");
        assert_eq!(body.error, "only the question author can accept answers");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/answers/a1/accept",
                serde_json::json!({"requestingUserId": "alice"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: AcceptResponse = read(response).await;
        assert_eq!(body, AcceptResponse { answer_id: "a1".into(), is_accepted: true });

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/answers/missing/accept",
                serde_json::json!({"requestingUserId": "alice"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closed_store_is_503() {
        let (app, store) = app().await;
        store.close().await.unwrap();

        let response = app.oneshot(vote("u1", 1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "1");
    }
}
