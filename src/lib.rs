pub mod config;
pub mod db;
pub mod errors;
pub mod routes;
pub mod server;
pub mod services;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: db::Database,
    pub config: config::AppConfig,
}
