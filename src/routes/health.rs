//! Liveness and database connectivity checks.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DATABASE_URL_VAR;
use crate::errors::DetailedError;
use crate::services::connectivity;
use crate::AppState;

pub const CONNECTION_OK_MESSAGE: &str = "Database connection successful";

/// Successful connectivity check.
#[derive(Debug, Serialize)]
pub struct ConnectivityStatus {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness check — always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// GET /test-db — open a fresh connection and report the store's clock.
pub async fn test_db(
    State(state): State<AppState>,
) -> Result<Json<ConnectivityStatus>, DetailedError> {
    tracing::info!("Testing database connection");
    tracing::info!(
        var = DATABASE_URL_VAR,
        present = state.config.database_url.is_some(),
        "Connection string presence"
    );

    let timestamp = connectivity::check(&state.db)
        .await
        .map_err(|e| e.with_details())?;
    tracing::info!(%timestamp, "Database connected successfully");

    Ok(Json(ConnectivityStatus {
        message: CONNECTION_OK_MESSAGE,
        timestamp,
    }))
}
