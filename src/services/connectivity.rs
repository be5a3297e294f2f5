//! Store connectivity check.

use chrono::{DateTime, Utc};
use sqlx::Connection;

use crate::db::Database;
use crate::errors::AppResult;

const STORE_CLOCK_SQL: &str = "SELECT NOW()";

/// Open a dedicated connection, read the store clock, and close the
/// connection again. The connection is closed whether or not the query
/// succeeded.
pub async fn check(db: &Database) -> AppResult<DateTime<Utc>> {
    read_clock(db, STORE_CLOCK_SQL).await
}

async fn read_clock(db: &Database, sql: &str) -> AppResult<DateTime<Utc>> {
    let mut conn = db.connect_dedicated().await?;

    let result = sqlx::query_scalar::<_, DateTime<Utc>>(sql)
        .fetch_one(&mut conn)
        .await;

    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "Failed to close connectivity check connection cleanly");
    }

    Ok(result?)
}
