use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input or a business rule the caller can fix.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid token")]
    InvalidOrExpiredToken,

    #[error("Email could not be sent")]
    EmailDelivery,

    /// The store could not be reached (pool timeout, I/O, TLS).
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_authorized() -> Self {
        Self::NotAuthenticated("Not authorized to access this route".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            AppError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailDelivery
            | AppError::UpstreamUnavailable(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UpstreamUnavailable(_) | AppError::Internal(_) => "Server Error".into(),
            other => other.to_string(),
        }
    }
}

macro_rules! rejection_as_validation {
    ($($rejection:ty),+) => {
        $(impl From<$rejection> for AppError {
            fn from(rejection: $rejection) -> Self {
                AppError::Validation(rejection.body_text())
            }
        })+
    };
}

rejection_as_validation!(JsonRejection, PathRejection, QueryRejection, MultipartRejection);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamUnavailable(_) | AppError::Internal(_) | AppError::EmailDelivery => {
                tracing::error!("internal error: {:#}", self);
            }
            AppError::NotAuthenticated(_) | AppError::Forbidden(_) => {
                tracing::info!("authorization error: {}", self);
            }
            _ => tracing::debug!("client error: {}", self),
        }

        let body = Json(json!({
            "success": false,
            "error": self.user_message(),
        }));
        (self.status_code(), body).into_response()
    }
}
