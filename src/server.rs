//! Serving the router over plain HTTP or HTTPS until a shutdown signal.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;

/// How long in-flight HTTPS requests may run after shutdown is signalled.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Serve plain HTTP until `shutdown` resolves.
pub async fn serve_http<F>(listener: TcpListener, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Serve HTTPS until `shutdown` resolves, then drain connections for at most
/// [`SHUTDOWN_GRACE`].
pub async fn serve_https<F>(
    addr: SocketAddr,
    tls: RustlsConfig,
    app: Router,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = axum_server::Handle::new();
    let signal = handle.clone();
    tokio::spawn(async move {
        shutdown.await;
        signal.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
}
