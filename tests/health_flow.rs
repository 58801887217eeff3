use async_trait::async_trait;
use chrono::Utc;
use payment_broker::domain::health::{HealthSnapshot, HealthView, Upstream};
use payment_broker::domain::payment::Payment;
use payment_broker::health::prober::HealthProber;
use payment_broker::health::registry::HealthRegistry;
use payment_broker::processors::{AdminSummary, ProcessorClient, ServiceHealth, UpstreamReply};
use payment_broker::store::health::HealthStore;
use payment_broker::store::pool::HandlePool;
use payment_broker::store::schema;
use std::sync::Arc;
use std::time::Duration;

/// Probe endpoints scripted per upstream; None behaves like a transport
/// failure.
struct HealthScript {
    default_health: Option<ServiceHealth>,
    fallback_health: Option<ServiceHealth>,
}

#[async_trait]
impl ProcessorClient for HealthScript {
    async fn service_health(&self, upstream: Upstream) -> anyhow::Result<ServiceHealth> {
        let scripted = match upstream {
            Upstream::Default => &self.default_health,
            Upstream::Fallback => &self.fallback_health,
        };
        scripted
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }

    async fn submit_payment(
        &self,
        _upstream: Upstream,
        _payment: &Payment,
    ) -> anyhow::Result<UpstreamReply> {
        anyhow::bail!("not dispatched in this test")
    }

    async fn admin_summary(
        &self,
        _upstream: Upstream,
        _from: &str,
        _to: &str,
    ) -> anyhow::Result<AdminSummary> {
        anyhow::bail!("not summarized in this test")
    }
}

async fn health_store(name: &str) -> HealthStore {
    let pool = HandlePool::new(
        format!("sqlite:file:{name}?mode=memory&cache=shared"),
        4,
        16,
    );
    schema::init(&pool).await.unwrap();
    HealthStore { pool }
}

fn prober(
    script: HealthScript,
    registry: Arc<HealthRegistry>,
    store: HealthStore,
) -> HealthProber {
    HealthProber {
        processors: Arc::new(script),
        registry,
        store,
        cadence: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn successful_probe_updates_registry_and_mirror() {
    let store = health_store("health_update").await;
    let registry = HealthRegistry::new();
    let prober = prober(
        HealthScript {
            default_health: Some(ServiceHealth {
                failing: false,
                min_response_time: 42,
            }),
            fallback_health: Some(ServiceHealth {
                failing: true,
                min_response_time: 7,
            }),
        },
        Arc::clone(&registry),
        store.clone(),
    );

    let before = Utc::now();
    prober.tick().await;

    let view = registry.read().await;
    assert!(!view.default.failing);
    assert_eq!(view.default.min_response_time, 42);
    assert!(view.default.last_check >= before);
    assert!(view.fallback.failing);
    assert_eq!(view.fallback.min_response_time, 7);

    let mirrored = store.load().await.unwrap();
    assert_eq!(mirrored.default.min_response_time, 42);
    assert!(mirrored.fallback.failing);
}

#[tokio::test]
async fn failed_probe_keeps_the_previous_snapshot() {
    let store = health_store("health_retain").await;
    let registry = HealthRegistry::seeded(HealthView {
        default: HealthSnapshot {
            failing: false,
            min_response_time: 33,
            last_check: Utc::now(),
        },
        fallback: HealthSnapshot::new(),
    });
    let prober = prober(
        HealthScript {
            default_health: None,
            fallback_health: Some(ServiceHealth {
                failing: false,
                min_response_time: 81,
            }),
        },
        Arc::clone(&registry),
        store,
    );

    prober.tick().await;

    let view = registry.read().await;
    // No news about the default upstream, so its snapshot is unchanged.
    assert!(!view.default.failing);
    assert_eq!(view.default.min_response_time, 33);
    assert_eq!(view.fallback.min_response_time, 81);
}

#[tokio::test]
async fn registry_seeds_from_the_persisted_mirror() {
    let store = health_store("health_seed").await;
    store
        .save(
            Upstream::Default,
            &HealthSnapshot {
                failing: true,
                min_response_time: 99,
                last_check: Utc::now(),
            },
        )
        .await
        .unwrap();

    let registry = HealthRegistry::seeded(store.load().await.unwrap());

    let view = registry.read().await;
    assert!(view.default.failing);
    assert_eq!(view.default.min_response_time, 99);
    assert!(!view.fallback.failing);
    assert_eq!(view.fallback.min_response_time, 0);
}
