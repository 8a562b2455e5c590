use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(#[source] reqwest::Error),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        // The URL carries the caller's query; keep it out of error text.
        let e = e.without_url();
        if e.is_timeout() {
            AppError::UpstreamTimeout(e)
        } else {
            AppError::UpstreamUnavailable(e)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MethodNotAllowed => {
                tracing::debug!("Rejected request: method not allowed");
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            }
            AppError::NotFound => {
                tracing::debug!("Rejected request: path not found");
                (StatusCode::NOT_FOUND, "Not found")
            }
            AppError::UpstreamTimeout(e) => {
                tracing::warn!("Upstream timed out: {}", e);
                (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out")
            }
            AppError::UpstreamUnavailable(e) => {
                tracing::error!("Upstream request failed: {}", e);
                (StatusCode::BAD_GATEWAY, "Upstream unavailable")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
