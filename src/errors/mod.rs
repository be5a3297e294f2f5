//! Unified error handling with the JSON error bodies returned by every route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Message used when a failure carries no description of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Body of a failed request: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a failed request that also exposes the raw failure:
/// `{"error": "...", "details": {...}}`.
#[derive(Debug, Serialize)]
pub struct DetailedErrorBody {
    pub error: String,
    pub details: Value,
}

/// Application error type. Every variant is a query-or-connection failure
/// from the caller's point of view and maps to status 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Stable machine-readable tag for logs and error details.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Database(e) => match e {
                sqlx::Error::Configuration(_) => "configuration",
                sqlx::Error::Database(_) => "database",
                sqlx::Error::Io(_) => "io",
                sqlx::Error::Tls(_) => "tls",
                sqlx::Error::Protocol(_) => "protocol",
                sqlx::Error::PoolTimedOut => "pool_timeout",
                sqlx::Error::PoolClosed => "pool_closed",
                sqlx::Error::RowNotFound
                | sqlx::Error::ColumnNotFound(_)
                | sqlx::Error::ColumnIndexOutOfBounds { .. }
                | sqlx::Error::ColumnDecode { .. }
                | sqlx::Error::Decode(_)
                | sqlx::Error::TypeNotFound { .. } => "decode",
                _ => "driver",
            },
        }
    }

    /// Human-readable description, never empty.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }

    /// Structured rendering of the raw failure.
    pub fn details(&self) -> Value {
        let code = match self {
            AppError::Database(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
            _ => None,
        };
        let debug = match self {
            AppError::Database(e) => format!("{e:?}"),
            other => format!("{other:?}"),
        };

        json!({
            "kind": self.kind(),
            "code": code,
            "debug": debug,
        })
    }

    /// Attach the raw failure to the response body.
    pub fn with_details(self) -> DetailedError {
        DetailedError(self)
    }

    fn log(&self) {
        tracing::error!(kind = self.kind(), error = %self, "Database request failed");
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorBody {
            error: self.message(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// An [`AppError`] rendered with its `details`.
#[derive(Debug)]
pub struct DetailedError(pub AppError);

impl From<AppError> for DetailedError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DetailedError {
    fn into_response(self) -> Response {
        self.0.log();
        let body = DetailedErrorBody {
            error: self.0.message(),
            details: self.0.details(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
