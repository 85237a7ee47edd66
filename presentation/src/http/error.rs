//! API error responses

use crate::dto::ErrorResponse;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use ledger_application::{AcceptAnswerError, ErrorKind, ReconcileError, VoteError};
use thiserror::Error;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Accept(#[from] AcceptAnswerError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Vote(e) => e.kind(),
            ApiError::Accept(e) => e.kind(),
            ApiError::Reconcile(ReconcileError::Listing(e)) => ErrorKind::of_store_error(e),
        }
    }

    /// Stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Vote(VoteError::InvalidVoteValue(_)) => "INVALID_VOTE_VALUE",
            ApiError::Vote(VoteError::UnknownItemKind(_)) => "UNKNOWN_ITEM_KIND",
            ApiError::Vote(VoteError::UnknownItem(_)) => "UNKNOWN_ITEM",
            ApiError::Accept(AcceptAnswerError::AnswerNotFound(_)) => "ANSWER_NOT_FOUND",
            ApiError::Accept(AcceptAnswerError::NotAuthorized) => "NOT_AUTHORIZED",
            _ => match self.kind() {
                ErrorKind::Unavailable => "SERVICE_UNAVAILABLE",
                _ => "INTERNAL_ERROR",
            },
        }
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);
        match kind {
            ErrorKind::Internal => tracing::error!("Request failed: {}", self),
            ErrorKind::Unavailable => tracing::warn!("Request failed: {}", self),
            _ => tracing::debug!("Request rejected: {}", self),
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        let mut response = (status, Json(body)).into_response();
        if kind == ErrorKind::Unavailable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_application::StoreError;
    use ledger_domain::{AnswerId, ItemRef};

    #[test]
    fn test_codes_and_statuses() {
        let cases = [
            (ApiError::from(VoteError::InvalidVoteValue(2)), StatusCode::BAD_REQUEST, "INVALID_VOTE_VALUE"),
            (
                ApiError::from(VoteError::UnknownItemKind("comment".into())),
                StatusCode::BAD_REQUEST,
                "UNKNOWN_ITEM_KIND",
            ),
            (
                ApiError::from(VoteError::UnknownItem(ItemRef::answer("a"))),
                StatusCode::NOT_FOUND,
                "UNKNOWN_ITEM",
            ),
            (
                ApiError::from(AcceptAnswerError::AnswerNotFound(AnswerId::new("a"))),
                StatusCode::NOT_FOUND,
                "ANSWER_NOT_FOUND",
            ),
            (ApiError::from(AcceptAnswerError::NotAuthorized), StatusCode::FORBIDDEN, "NOT_AUTHORIZED"),
            (
                ApiError::from(VoteError::ServiceUnavailable("busy".into())),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
            (
                ApiError::from(VoteError::Store(StoreError::Corrupt("bad".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(status_for(error.kind()), status, "{error}");
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn test_unavailable_sets_retry_after() {
        let response = ApiError::from(AcceptAnswerError::ServiceUnavailable("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "1");

        let response = ApiError::from(AcceptAnswerError::NotAuthorized).into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
