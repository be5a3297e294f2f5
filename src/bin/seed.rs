//! Seed script for development — creates the dashboard relations if absent and
//! populates them with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `POSTGRES_URL` (reads .env). The connection always uses TLS.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var(dashboard_api::config::DATABASE_URL_VAR)
        .map_err(|_| anyhow::anyhow!("POSTGRES_URL must be set"))?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect_with(dashboard_api::db::connect_options(&db_url)?)
        .await?;

    println!("=== Dashboard Seed Script ===");

    sqlx::raw_sql(SCHEMA_SQL).execute(&pool).await?;
    println!("[done] Schema ensured");

    seed_users(&pool).await?;
    let customer_ids = seed_customers(&pool).await?;
    seed_invoices(&pool, &customer_ids).await?;
    seed_revenue(&pool).await?;

    println!("\n=== Seed complete! ===");
    pool.close().await;

    Ok(())
}

async fn table_is_empty(pool: &PgPool, count_sql: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(count_sql).fetch_one(pool).await?;
    Ok(count == 0)
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    if !table_is_empty(pool, "SELECT COUNT(*) FROM users").await? {
        println!("[skip] Users already exist");
        return Ok(());
    }

    sqlx::query("INSERT INTO users (name, email) VALUES ($1, $2)")
        .bind("User")
        .bind("user@nextmail.com")
        .execute(pool)
        .await?;

    println!("[done] Created 1 user");
    Ok(())
}

async fn seed_customers(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    if !table_is_empty(pool, "SELECT COUNT(*) FROM customers").await? {
        println!("[skip] Customers already exist");
        let ids = sqlx::query_scalar("SELECT id FROM customers")
            .fetch_all(pool)
            .await?;
        return Ok(ids);
    }

    let customers = [
        ("Evil Rabbit", "evil@rabbit.com"),
        ("Delba de Oliveira", "delba@oliveira.com"),
        ("Lee Robinson", "lee@robinson.com"),
        ("Michael Novotny", "michael@novotny.com"),
        ("Amy Burns", "amy@burns.com"),
        ("Balazs Orban", "balazs@orban.com"),
    ];

    let mut ids = Vec::with_capacity(customers.len());
    for (name, email) in customers {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO customers (id, name, email) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(email)
            .execute(pool)
            .await?;
        ids.push(id);
    }

    println!("[done] Created {} customers", ids.len());
    Ok(ids)
}

async fn seed_invoices(pool: &PgPool, customer_ids: &[Uuid]) -> anyhow::Result<()> {
    if !table_is_empty(pool, "SELECT COUNT(*) FROM invoices").await? {
        println!("[skip] Invoices already exist");
        return Ok(());
    }
    if customer_ids.is_empty() {
        println!("[skip] No customers to invoice");
        return Ok(());
    }

    let invoices = [
        (15795, "pending", (2022, 12, 6)),
        (20348, "pending", (2022, 11, 14)),
        (3040, "paid", (2022, 10, 29)),
        (44800, "paid", (2023, 9, 10)),
        (34577, "pending", (2023, 8, 5)),
        (54246, "pending", (2023, 7, 16)),
        (666, "pending", (2023, 6, 27)),
        (32545, "paid", (2023, 6, 9)),
        (1250, "paid", (2023, 6, 17)),
        (8546, "paid", (2023, 6, 7)),
        (500, "paid", (2023, 8, 19)),
        (8945, "paid", (2023, 6, 3)),
        (1000, "paid", (2022, 6, 5)),
    ];

    for (i, (amount, status, (y, m, d))) in invoices.iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(*y, *m, *d)
            .ok_or_else(|| anyhow::anyhow!("invalid invoice date {y}-{m}-{d}"))?;
        sqlx::query(
            "INSERT INTO invoices (customer_id, amount, status, date) VALUES ($1, $2, $3, $4)",
        )
        .bind(customer_ids[i % customer_ids.len()])
        .bind(*amount)
        .bind(*status)
        .bind(date)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} invoices", invoices.len());
    Ok(())
}

async fn seed_revenue(pool: &PgPool) -> anyhow::Result<()> {
    let months = [
        ("Jan", 2000),
        ("Feb", 1800),
        ("Mar", 2200),
        ("Apr", 2500),
        ("May", 2300),
        ("Jun", 3200),
        ("Jul", 3500),
        ("Aug", 3700),
        ("Sep", 2500),
        ("Oct", 2800),
        ("Nov", 3000),
        ("Dec", 4800),
    ];

    for (month, revenue) in months {
        sqlx::query("INSERT INTO revenue (month, revenue) VALUES ($1, $2) ON CONFLICT (month) DO NOTHING")
            .bind(month)
            .bind(revenue)
            .execute(pool)
            .await?;
    }

    println!("[done] Revenue rows ensured ({})", months.len());
    Ok(())
}
