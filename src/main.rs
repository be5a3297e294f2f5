use std::net::SocketAddr;

use anyhow::Context;
use dashboard_api::config::AppConfig;
use dashboard_api::db::Database;
use dashboard_api::{routes, server, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env();
    let db = Database::from_config(&config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let tls = config.tls.clone();

    let app = routes::router(AppState {
        db: db.clone(),
        config,
    });

    match tls {
        Some(tls) => {
            rustls::crypto::aws_lc_rs::default_provider()
                .install_default()
                .map_err(|_| anyhow::anyhow!("a rustls crypto provider is already installed"))?;
            let rustls_config =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                    .await
                    .context("failed to load TLS certificate or key")?;

            tracing::info!(host = %addr, "Starting dashboard API server (HTTPS)");
            server::serve_https(addr, rustls_config, app, shutdown_signal()).await?;
        }
        None => {
            tracing::info!(host = %addr, "Starting dashboard API server");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            server::serve_http(listener, app, shutdown_signal()).await?;
        }
    }

    tracing::info!("Server stopped; closing database pool");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
