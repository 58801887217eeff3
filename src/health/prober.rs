use crate::domain::health::{HealthSnapshot, Upstream};
use crate::health::registry::HealthRegistry;
use crate::processors::ProcessorClient;
use crate::store::health::HealthStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Periodic sampler of upstream health. A failed probe is absence of
/// news: the prior snapshot stays, only a successful probe moves the
/// registry.
pub struct HealthProber {
    pub processors: Arc<dyn ProcessorClient>,
    pub registry: Arc<HealthRegistry>,
    pub store: HealthStore,
    pub cadence: Duration,
}

impl HealthProber {
    pub async fn run(self) {
        loop {
            self.tick().await;
            tokio::time::sleep(self.cadence).await;
        }
    }

    pub async fn tick(&self) {
        for upstream in Upstream::ALL {
            match self.processors.service_health(upstream).await {
                Ok(health) => {
                    let snapshot = HealthSnapshot {
                        failing: health.failing,
                        min_response_time: health.min_response_time,
                        last_check: Utc::now(),
                    };
                    self.registry.update(upstream, snapshot.clone()).await;
                    if let Err(err) = self.store.save(upstream, &snapshot).await {
                        tracing::error!("persisting health of {}: {err:#}", upstream.as_str());
                    }
                }
                Err(err) => {
                    tracing::warn!("health probe for {} failed: {err:#}", upstream.as_str());
                }
            }
        }
    }
}
