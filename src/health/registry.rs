use crate::domain::health::{HealthSnapshot, HealthView, Upstream};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owner of the in-memory health state. Both snapshots live behind one
/// lock, so a read is always a consistent pair.
pub struct HealthRegistry {
    inner: RwLock<HealthView>,
}

impl HealthRegistry {
    pub fn new() -> Arc<Self> {
        Self::seeded(HealthView::new())
    }

    pub fn seeded(view: HealthView) -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(view),
        })
    }

    pub async fn read(&self) -> HealthView {
        self.inner.read().await.clone()
    }

    pub async fn update(&self, upstream: Upstream, snapshot: HealthSnapshot) {
        let mut view = self.inner.write().await;
        match upstream {
            Upstream::Default => view.default = snapshot,
            Upstream::Fallback => view.fallback = snapshot,
        }
    }
}
