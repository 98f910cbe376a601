// crates/gatehouse-lib/src/error.rs

//! Central error type + Axum integration.
//!
//! Expected authentication rejections are NOT errors; they travel as
//! [`crate::auth::AuthOutcome::Rejected`] values. Everything here is either a
//! caller mistake (4xx) or an infrastructure failure (5xx).
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("credential store failure: {0}")]
    Store(#[from] StoreError),

    #[error("session store failure: {0}")]
    Session(String),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("provider exchange failed: {0}")]
    Provider(String),

    #[error("provider timed out")]
    ProviderTimeout,

    #[error("account already exists")]
    AccountExists,

    #[error("password does not meet requirements")]
    WeakPassword,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::Conflict(_)) | AppError::AccountExists => {
                StatusCode::CONFLICT
            },
            AppError::Store(_) | AppError::Session(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
            AppError::UnknownStrategy(_)
            | AppError::WeakPassword
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::ProviderTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Store(_) => "STORE_001",
            AppError::Session(_) => "SESS_001",
            AppError::UnknownStrategy(_) => "STRAT_001",
            AppError::Provider(_) => "PROV_001",
            AppError::ProviderTimeout => "PROV_002",
            AppError::AccountExists => "ACCT_001",
            AppError::WeakPassword => "PWD_001",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Unauthenticated => "AUTH_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Store(_) | AppError::Session(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
            AppError::UnknownStrategy(_) => "Unknown authentication method".to_string(),
            AppError::Provider(_) | AppError::ProviderTimeout => {
                "Sign-in provider is unavailable, please try again later".to_string()
            },
            AppError::AccountExists => {
                "An account with this email already exists".to_string()
            },
            AppError::WeakPassword => {
                "Password does not meet the complexity requirements".to_string()
            },
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::Unauthenticated => "Authentication required".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
