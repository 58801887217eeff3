use crate::domain::health::Upstream;
use crate::domain::payment::Payment;
use crate::processors::{AdminSummary, ProcessorClient, ServiceHealth, UpstreamReply};
use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use std::time::Duration;

pub struct HttpProcessorClient {
    pub default_url: String,
    pub fallback_url: String,
    pub admin_token: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

impl HttpProcessorClient {
    fn base(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Default => &self.default_url,
            Upstream::Fallback => &self.fallback_url,
        }
    }
}

#[async_trait::async_trait]
impl ProcessorClient for HttpProcessorClient {
    async fn service_health(&self, upstream: Upstream) -> Result<ServiceHealth> {
        let url = format!("{}/payments/service-health", self.base(upstream));
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;

        Ok(resp.json().await?)
    }

    async fn submit_payment(&self, upstream: Upstream, payment: &Payment) -> Result<UpstreamReply> {
        let url = format!("{}/payments", self.base(upstream));
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payment)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        if resp.status() == StatusCode::OK {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("payment processed")
                .to_string();
            Ok(UpstreamReply { accepted: true, message })
        } else {
            let body = resp.text().await.unwrap_or_default();
            Ok(UpstreamReply {
                accepted: false,
                message: body.chars().take(200).collect(),
            })
        }
    }

    async fn admin_summary(
        &self,
        upstream: Upstream,
        from: &str,
        to: &str,
    ) -> Result<AdminSummary> {
        let url = format!("{}/admin/payments-summary", self.base(upstream));
        let resp = self
            .client
            .get(&url)
            .query(&[("from", from), ("to", to)])
            .header("Content-Type", "application/json")
            .header("X-Rinha-Token", &self.admin_token)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        if resp.status() != StatusCode::OK {
            bail!("admin summary answered {}", resp.status());
        }

        Ok(resp.json().await?)
    }
}
