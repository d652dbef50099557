// Route-boundary error taxonomy; every failure leaves as a structured
// {error, details} payload.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unsupported resource arn: {0}")]
    UnsupportedArn(String),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("aggregation failed")]
    Aggregation(#[source] anyhow::Error),
    #[error("chat upstream failed")]
    ChatUpstream(#[source] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnsupportedArn(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Aggregation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ChatUpstream(_) => StatusCode::BAD_GATEWAY,
        };
        let details = match &self {
            ApiError::Aggregation(e) | ApiError::ChatUpstream(e) => format!("{e:#}"),
            other => other.to_string(),
        };
        tracing::warn!(status = %status, error = %self, "request failed");
        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "details": details,
            })),
        )
            .into_response()
    }
}
