//! Dashboard routes: counts and an invoice sample for the overview page.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

/// GET /query — dashboard counts and up to ten sample invoices.
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = dashboard::get_stats(&state.db, state.config.stats_snapshot).await?;
    Ok(Json(stats))
}
