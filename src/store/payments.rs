use crate::domain::health::Upstream;
use crate::domain::payment::PaymentRecord;
use crate::store::pool::HandlePool;
use anyhow::Result;
use sqlx::Row;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentsStore {
    pub pool: Arc<HandlePool>,
}

impl PaymentsStore {
    /// Appends one row. No retry on failure; the caller decides what a
    /// failed insert means.
    pub async fn insert(&self, record: &PaymentRecord) -> Result<()> {
        let mut handle = self.pool.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO payments (correlationId, amount, requestedAt, defaultService, processed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&record.payment.correlation_id)
        .bind(record.payment.amount)
        .bind(record.payment.requested_at_iso())
        .bind(record.default_service as i64)
        .bind(record.processed as i64)
        .execute(&mut *handle)
        .await?;

        Ok(())
    }

    pub async fn total_amount(&self, upstream: Upstream, from: &str, to: &str) -> Result<f64> {
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0.0) AS total FROM {} WHERE {}",
            view_for(upstream),
            RANGE_PREDICATE
        );

        let mut handle = self.pool.acquire().await?;
        let row = sqlx::query(&sql)
            .bind(from)
            .bind(to)
            .fetch_one(&mut *handle)
            .await?;

        Ok(row.get("total"))
    }

    pub async fn total_count(&self, upstream: Upstream, from: &str, to: &str) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) AS total FROM {} WHERE {}",
            view_for(upstream),
            RANGE_PREDICATE
        );

        let mut handle = self.pool.acquire().await?;
        let row = sqlx::query(&sql)
            .bind(from)
            .bind(to)
            .fetch_one(&mut *handle)
            .await?;

        Ok(row.get("total"))
    }

    pub async fn purge_all(&self) -> Result<u64> {
        let mut handle = self.pool.acquire().await?;
        let done = sqlx::query("DELETE FROM payments")
            .execute(&mut *handle)
            .await?;

        Ok(done.rows_affected())
    }
}

/// Inclusive range over `requestedAt`, compared as epoch seconds so
/// sub-second suffixes never reorder the endpoints.
const RANGE_PREDICATE: &str = "CAST(strftime('%s', requestedAt) AS INTEGER) \
     BETWEEN CAST(strftime('%s', ?1) AS INTEGER) AND CAST(strftime('%s', ?2) AS INTEGER)";

fn view_for(upstream: Upstream) -> &'static str {
    match upstream {
        Upstream::Default => "payments_default",
        Upstream::Fallback => "payments_fallback",
    }
}
