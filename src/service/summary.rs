use crate::domain::health::Upstream;
use crate::processors::ProcessorClient;
use crate::store::payments::PaymentsStore;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamTotals {
    pub total_requests: i64,
    #[serde(serialize_with = "two_decimals")]
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentsSummary {
    pub default: UpstreamTotals,
    pub fallback: UpstreamTotals,
}

#[derive(Clone)]
pub struct SummaryService {
    pub processors: Arc<dyn ProcessorClient>,
    pub store: PaymentsStore,
}

impl SummaryService {
    /// Prefers each upstream's own admin totals; anything short of a 200
    /// falls back to what was persisted locally. The two upstreams are
    /// resolved independently.
    pub async fn summarize(&self, from: &str, to: &str) -> Result<PaymentsSummary> {
        Ok(PaymentsSummary {
            default: self.totals_for(Upstream::Default, from, to).await?,
            fallback: self.totals_for(Upstream::Fallback, from, to).await?,
        })
    }

    async fn totals_for(&self, upstream: Upstream, from: &str, to: &str) -> Result<UpstreamTotals> {
        match self.processors.admin_summary(upstream, from, to).await {
            Ok(summary) => Ok(UpstreamTotals {
                total_requests: summary.total_requests,
                total_amount: summary.total_amount,
            }),
            Err(err) => {
                tracing::debug!(
                    "admin summary for {} unavailable, using local store: {err:#}",
                    upstream.as_str()
                );
                Ok(UpstreamTotals {
                    total_requests: self.store.total_count(upstream, from, to).await?,
                    total_amount: self.store.total_amount(upstream, from, to).await?,
                })
            }
        }
    }
}

fn two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
