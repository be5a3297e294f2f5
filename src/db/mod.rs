//! Database connection provider.
//!
//! [`Database`] is built once at startup and shared through `AppState`. It owns
//! a lazily connecting pool (connections are acquired per query and returned on
//! drop) and the connect options used to open dedicated, request-scoped
//! connections. Every connection it produces uses TLS.

use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Connection, PgConnection, PgPool, Postgres};

use crate::config::{AppConfig, DATABASE_URL_VAR};
use crate::errors::{AppError, AppResult};

/// Injectable source of PostgreSQL connections.
#[derive(Debug, Clone)]
pub struct Database {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    Ready {
        pool: PgPool,
        options: PgConnectOptions,
    },
    /// Misconfiguration is reported on first use, not at startup.
    Unavailable(String),
}

impl Database {
    /// Build the provider from configuration. No connection is opened here.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &AppConfig) -> Self {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!(
                var = DATABASE_URL_VAR,
                "Connection string is not set; database requests will fail"
            );
            return Self::unavailable(format!("{DATABASE_URL_VAR} is not set"));
        };

        let options = match connect_options(url) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "Connection string could not be parsed");
                return Self::unavailable(e.to_string());
            }
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
            .connect_lazy_with(options.clone());

        Self {
            backend: Backend::Ready { pool, options },
        }
    }

    /// A provider whose every request fails with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable(reason.into()),
        }
    }

    /// The shared pool. Each query run against it acquires a connection and
    /// releases it when the query completes.
    pub fn pool(&self) -> AppResult<&PgPool> {
        match &self.backend {
            Backend::Ready { pool, .. } => Ok(pool),
            Backend::Unavailable(reason) => Err(AppError::Configuration(reason.clone())),
        }
    }

    /// Acquire a pooled connection, returned to the pool when dropped.
    pub async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        Ok(self.pool()?.acquire().await?)
    }

    /// Open a new connection outside the pool. The caller owns it and should
    /// `close()` it when done.
    pub async fn connect_dedicated(&self) -> AppResult<PgConnection> {
        match &self.backend {
            Backend::Ready { options, .. } => Ok(PgConnection::connect_with(options).await?),
            Backend::Unavailable(reason) => Err(AppError::Configuration(reason.clone())),
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        if let Backend::Ready { pool, .. } = &self.backend {
            pool.close().await;
        }
    }
}

/// Parse a connection string and force an encrypted transport.
///
/// The driver resolves the requested mode from the URL and the `PGSSLMODE`
/// environment variable; [`enforce_tls`] is applied on top of that.
pub fn connect_options(url: &str) -> Result<PgConnectOptions, sqlx::Error> {
    Ok(enforce_tls(PgConnectOptions::from_str(url)?))
}

/// TLS is mandatory: anything weaker than `require` is upgraded,
/// certificate-verifying modes are kept.
pub fn enforce_tls(options: PgConnectOptions) -> PgConnectOptions {
    let mode = match options.get_ssl_mode() {
        mode @ (PgSslMode::VerifyCa | PgSslMode::VerifyFull) => mode,
        _ => PgSslMode::Require,
    };
    options.ssl_mode(mode)
}
