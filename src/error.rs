use axum::{
    extract::rejection::{FormRejection, PathRejection, QueryRejection, RawFormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{error, warn};

use crate::views;

#[derive(Debug, ThisError)]
pub enum DeskError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeskError {
    pub fn unauthorized() -> Self {
        DeskError::Unauthorized("not authenticated".to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            DeskError::Validation(_) => StatusCode::BAD_REQUEST,
            DeskError::Unauthorized(_) => StatusCode::SEE_OTHER,
            DeskError::Conflict(_) => StatusCode::CONFLICT,
            DeskError::NotFound(_) => StatusCode::NOT_FOUND,
            DeskError::Provider(ProviderError::Network(_)) => StatusCode::GATEWAY_TIMEOUT,
            DeskError::Provider(_) => StatusCode::BAD_GATEWAY,
            DeskError::Database(_)
            | DeskError::Json(_)
            | DeskError::PasswordHash(_)
            | DeskError::Config(_)
            | DeskError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            DeskError::Unauthorized(reason) => {
                warn!(reason = %reason, "unauthenticated request redirected to login");
                return Redirect::to("/").into_response();
            }
            DeskError::Validation(msg) | DeskError::Conflict(msg) | DeskError::NotFound(msg) => {
                msg.clone()
            }
            DeskError::Provider(ProviderError::Authentication(_)) => {
                "The DNS provider rejected the API key for this account.".to_string()
            }
            DeskError::Provider(ProviderError::Network(_)) => {
                "The DNS provider could not be reached.".to_string()
            }
            DeskError::Provider(e) => format!("DNS provider error: {e}"),
            DeskError::Database(_)
            | DeskError::Json(_)
            | DeskError::PasswordHash(_)
            | DeskError::Config(_)
            | DeskError::Io(_) => {
                error!(error = %self, "internal error while handling request");
                "An internal server error occurred.".to_string()
            }
        };
        (status, views::error_page(status, &message)).into_response()
    }
}

macro_rules! rejection_as_validation {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for DeskError {
                fn from(rejection: $rejection) -> Self {
                    DeskError::Validation(rejection.body_text())
                }
            }
        )*
    };
}

rejection_as_validation!(FormRejection, PathRejection, QueryRejection, RawFormRejection);

/// Failures surfaced by the remote DNS provider client.
#[derive(Debug, Clone, ThisError)]
pub enum ProviderError {
    /// The provider refused the API key (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Connection failure, timeout, or truncated body.
    #[error("network error: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status reported by the provider.
    #[error("provider returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// The request could not be built, or the response could not be decoded.
    #[error("unexpected provider exchange: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() || e.is_decode() {
            ProviderError::Parse(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}
