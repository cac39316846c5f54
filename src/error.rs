use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    data::LoadError,
    services::{candidates::CandidateError, reranker::RerankError},
};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Data load error: {0}")]
    Load(#[from] LoadError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RerankError> for AppError {
    fn from(err: RerankError) -> Self {
        match err {
            RerankError::UserNotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<CandidateError> for AppError {
    fn from(err: CandidateError) -> Self {
        match err {
            CandidateError::NotFound(_) => AppError::NotFound(err.to_string()),
            CandidateError::UpstreamUnavailable(msg) => AppError::UpstreamUnavailable(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Load(_) | AppError::DataUnavailable(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::UpstreamUnavailable("x".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::DataUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_user_not_found_maps_to_not_found() {
        let err: AppError = RerankError::UserNotFound(42).into();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("42")));
    }

    #[test]
    fn test_candidate_errors_map() {
        let err: AppError = CandidateError::UpstreamUnavailable("timeout".into()).into();
        assert!(matches!(err, AppError::UpstreamUnavailable(ref msg) if msg == "timeout"));

        let err: AppError = CandidateError::NotFound(7).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
