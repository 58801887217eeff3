use crate::domain::health::Upstream;
use crate::domain::payment::Payment;
use anyhow::Result;
use serde::{Deserialize, Deserializer};

pub mod http;

/// Health probe payload as reported by an upstream processor. `failing`
/// arrives as a bool or as 0/1 depending on the processor build.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    #[serde(deserialize_with = "bool_or_int")]
    pub failing: bool,
    #[serde(rename = "minResponseTime")]
    pub min_response_time: u64,
}

/// Outcome of a payment submission for which an HTTP status was received.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// True iff the upstream answered HTTP 200.
    pub accepted: bool,
    /// The upstream's `message` on acceptance, its raw payload otherwise.
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_requests: i64,
    pub total_amount: f64,
}

#[async_trait::async_trait]
pub trait ProcessorClient: Send + Sync {
    async fn service_health(&self, upstream: Upstream) -> Result<ServiceHealth>;

    /// Submits a payment. Err only when the call failed in transit before
    /// any status was received.
    async fn submit_payment(&self, upstream: Upstream, payment: &Payment) -> Result<UpstreamReply>;

    /// Admin-side totals for a time range. Err on any non-200 so callers
    /// fall back to local data.
    async fn admin_summary(&self, upstream: Upstream, from: &str, to: &str)
        -> Result<AdminSummary>;
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}
