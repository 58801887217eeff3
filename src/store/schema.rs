use crate::domain::health::Upstream;
use crate::store::pool::HandlePool;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

/// Creates the payments schema, the per-upstream views, and the seeded
/// health mirror rows. Safe to run on every start.
pub async fn init(pool: &Arc<HandlePool>) -> Result<()> {
    let mut handle = pool.acquire().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            correlationId TEXT NOT NULL,
            amount REAL NOT NULL,
            requestedAt DATETIME NOT NULL,
            defaultService INTEGER NOT NULL,
            processed INTEGER NOT NULL
        )
        "#,
    )
    .execute(&mut *handle)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_payments_requested_at ON payments (requestedAt)")
        .execute(&mut *handle)
        .await?;

    sqlx::query(
        r#"
        CREATE VIEW IF NOT EXISTS payments_default AS
            SELECT * FROM payments WHERE processed = 1 AND defaultService = 1
        "#,
    )
    .execute(&mut *handle)
    .await?;

    sqlx::query(
        r#"
        CREATE VIEW IF NOT EXISTS payments_fallback AS
            SELECT * FROM payments WHERE processed = 1 AND defaultService = 0
        "#,
    )
    .execute(&mut *handle)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_health_check (
            service TEXT PRIMARY KEY,
            failing INTEGER NOT NULL,
            minResponseTime INTEGER NOT NULL,
            lastCheck DATETIME NOT NULL
        )
        "#,
    )
    .execute(&mut *handle)
    .await?;

    let seeded_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    for upstream in Upstream::ALL {
        sqlx::query(
            "INSERT OR IGNORE INTO service_health_check (service, failing, minResponseTime, lastCheck) \
             VALUES (?1, 0, 0, ?2)",
        )
        .bind(upstream.as_str())
        .bind(&seeded_at)
        .execute(&mut *handle)
        .await?;
    }

    Ok(())
}
