//! Route definitions for the dashboard API.

pub mod dashboard;
pub mod health;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router. Shared by the server binary and tests.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(&state.config.frontend_url))
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/test-db", get(health::test_db))
        .route("/query", get(dashboard::stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn allowed_origin(frontend_url: &str) -> AllowOrigin {
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL; CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}
