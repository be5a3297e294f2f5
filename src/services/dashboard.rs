//! Dashboard statistics aggregation queries.

use serde::Serialize;
use serde_json::Number;
use sqlx::{Connection, PgExecutor, PgPool};

use crate::db::Database;
use crate::errors::AppResult;

/// Maximum number of rows in the invoice sample.
pub const SAMPLE_INVOICE_LIMIT: i64 = 10;

/// Counts plus a small invoice sample for the overview page.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub counts: Counts,
    #[serde(rename = "sampleInvoices")]
    pub sample_invoices: Vec<InvoiceSample>,
}

/// Row counts, one per dashboard relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub users: i64,
    pub customers: i64,
    pub invoices: i64,
    pub revenue: i64,
}

/// One invoice joined to its customer's display name.
///
/// `amount` goes through `to_jsonb` so integer and `NUMERIC` columns both
/// come back without rounding.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct InvoiceSample {
    #[sqlx(json)]
    pub amount: Number,
    pub name: String,
}

/// The relations counted on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Users,
    Customers,
    Invoices,
    Revenue,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::Users,
        Relation::Customers,
        Relation::Invoices,
        Relation::Revenue,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Relation::Users => "users",
            Relation::Customers => "customers",
            Relation::Invoices => "invoices",
            Relation::Revenue => "revenue",
        }
    }

    fn count_sql(self) -> &'static str {
        match self {
            Relation::Users => "SELECT COUNT(*) FROM users",
            Relation::Customers => "SELECT COUNT(*) FROM customers",
            Relation::Invoices => "SELECT COUNT(*) FROM invoices",
            Relation::Revenue => "SELECT COUNT(*) FROM revenue",
        }
    }
}

const SAMPLE_INVOICES_SQL: &str = r#"
    SELECT to_jsonb(invoices.amount) AS amount, customers.name
    FROM invoices
    JOIN customers ON invoices.customer_id = customers.id
    LIMIT $1
"#;

/// Fetch dashboard statistics.
///
/// With `snapshot` unset the five queries run concurrently on the pool. With
/// it set they run on one connection inside a repeatable-read, read-only
/// transaction so the counts and sample are mutually consistent. Any failure
/// aborts the whole operation.
pub async fn get_stats(db: &Database, snapshot: bool) -> AppResult<DashboardStats> {
    if snapshot {
        get_stats_snapshot(db).await
    } else {
        get_stats_concurrent(db.pool()?).await
    }
}

async fn get_stats_concurrent(pool: &PgPool) -> AppResult<DashboardStats> {
    let (users, customers, invoices, revenue, sample_invoices) = tokio::try_join!(
        fetch_count(pool, Relation::Users),
        fetch_count(pool, Relation::Customers),
        fetch_count(pool, Relation::Invoices),
        fetch_count(pool, Relation::Revenue),
        fetch_sample_invoices(pool),
    )?;

    Ok(DashboardStats {
        counts: Counts {
            users,
            customers,
            invoices,
            revenue,
        },
        sample_invoices,
    })
}

async fn get_stats_snapshot(db: &Database) -> AppResult<DashboardStats> {
    let mut conn = db.acquire().await?;
    let mut tx = conn.begin().await?;

    // Must precede every other statement in the transaction.
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let users = fetch_count(&mut *tx, Relation::Users).await?;
    let customers = fetch_count(&mut *tx, Relation::Customers).await?;
    let invoices = fetch_count(&mut *tx, Relation::Invoices).await?;
    let revenue = fetch_count(&mut *tx, Relation::Revenue).await?;
    let sample_invoices = fetch_sample_invoices(&mut *tx).await?;

    tx.commit().await?;

    Ok(DashboardStats {
        counts: Counts {
            users,
            customers,
            invoices,
            revenue,
        },
        sample_invoices,
    })
}

/// Count every row of one relation.
async fn fetch_count<'e, E>(executor: E, relation: Relation) -> AppResult<i64>
where
    E: PgExecutor<'e>,
{
    let count = sqlx::query_scalar::<_, i64>(relation.count_sql())
        .fetch_one(executor)
        .await?;
    tracing::debug!(relation = relation.table(), count, "Counted relation");
    Ok(count)
}

/// Up to [`SAMPLE_INVOICE_LIMIT`] invoices with their customer names, in
/// whatever order the store returns them.
async fn fetch_sample_invoices<'e, E>(executor: E) -> AppResult<Vec<InvoiceSample>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, InvoiceSample>(SAMPLE_INVOICES_SQL)
        .bind(SAMPLE_INVOICE_LIMIT)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}
