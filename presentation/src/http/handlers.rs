//! API request handlers

use super::error::ApiResult;
use super::state::AppState;
use crate::dto::{
    AcceptRequest, AcceptResponse, HealthResponse, ReconcileResponse, TallyResponse,
    VoteRequest, VoteResponse, VoteStatusQuery, VoteStatusResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use ledger_application::{AcceptAnswerInput, SubmitVoteInput, VoteError, VoteStatusInput};
use ledger_domain::{ItemKind, ItemRef};

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
    })
}

/// `POST /api/v1/votes`
pub async fn submit_vote(
    State(state): State<AppState>,
    Json(request): Json<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let input = SubmitVoteInput::new(
        request.user_id,
        request.item_id,
        request.item_kind,
        request.value,
    );
    let outcome = state.service.submit_vote(input).await?;
    Ok(Json(outcome.into()))
}

/// `GET /api/v1/votes/status`
pub async fn vote_status(
    State(state): State<AppState>,
    Query(query): Query<VoteStatusQuery>,
) -> ApiResult<Json<VoteStatusResponse>> {
    let input = VoteStatusInput::new(query.user_id, query.item_id, query.item_kind);
    let status = state.service.vote_status(input).await?;
    Ok(Json(status.into()))
}

/// `PUT /api/v1/answers/:answer_id/accept`
pub async fn accept_answer(
    State(state): State<AppState>,
    Path(answer_id): Path<String>,
    Json(request): Json<AcceptRequest>,
) -> ApiResult<Json<AcceptResponse>> {
    let input = AcceptAnswerInput::new(request.requesting_user_id, answer_id);
    let outcome = state.service.accept_answer(input).await?;
    Ok(Json(outcome.into()))
}

/// `GET /api/v1/items/:item_kind/:item_id/tally`
pub async fn item_tally(
    State(state): State<AppState>,
    Path((item_kind, item_id)): Path<(String, String)>,
) -> ApiResult<Json<TallyResponse>> {
    let kind: ItemKind = item_kind.parse().map_err(VoteError::from)?;
    let item = ItemRef::new(item_id, kind);
    let tally = state.service.tally(&item).await?;
    Ok(Json(TallyResponse::new(&item, &tally)))
}

/// `POST /api/v1/reconcile`
pub async fn reconcile(State(state): State<AppState>) -> ApiResult<Json<ReconcileResponse>> {
    let report = state.service.reconcile().await?;
    Ok(Json(ReconcileResponse::from(&report)))
}
