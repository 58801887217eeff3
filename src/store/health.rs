use crate::domain::health::{HealthSnapshot, HealthView, Upstream};
use crate::store::pool::HandlePool;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use std::sync::Arc;

/// Durable mirror of the health registry, two rows keyed by upstream name.
#[derive(Clone)]
pub struct HealthStore {
    pub pool: Arc<HandlePool>,
}

impl HealthStore {
    pub async fn save(&self, upstream: Upstream, snapshot: &HealthSnapshot) -> Result<()> {
        let mut handle = self.pool.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO service_health_check (service, failing, minResponseTime, lastCheck)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (service) DO UPDATE SET
                failing = excluded.failing,
                minResponseTime = excluded.minResponseTime,
                lastCheck = excluded.lastCheck
            "#,
        )
        .bind(upstream.as_str())
        .bind(snapshot.failing as i64)
        .bind(snapshot.min_response_time as i64)
        .bind(snapshot.last_check.to_rfc3339_opts(SecondsFormat::Millis, true))
        .execute(&mut *handle)
        .await?;

        Ok(())
    }

    /// Loads both rows; a row that is absent or unparseable on a fresh
    /// database leaves the initial snapshot in place.
    pub async fn load(&self) -> Result<HealthView> {
        let mut handle = self.pool.acquire().await?;
        let rows =
            sqlx::query("SELECT service, failing, minResponseTime, lastCheck FROM service_health_check")
                .fetch_all(&mut *handle)
                .await?;

        let mut view = HealthView::new();
        for row in rows {
            let service: String = row.get("service");
            let last_check: String = row.get("lastCheck");
            let snapshot = HealthSnapshot {
                failing: row.get::<i64, _>("failing") != 0,
                min_response_time: row.get::<i64, _>("minResponseTime").max(0) as u64,
                last_check: DateTime::parse_from_rfc3339(&last_check)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            };
            match service.as_str() {
                "default" => view.default = snapshot,
                "fallback" => view.fallback = snapshot,
                _ => {}
            }
        }

        Ok(view)
    }
}
