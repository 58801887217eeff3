use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Inbound body for `POST /payments`. Both fields are validated for
/// presence by the dispatcher so the error message can name the one
/// that is missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub correlation_id: Option<String>,
    pub amount: Option<f64>,
}

/// A payment as sent upstream and echoed back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub correlation_id: String,
    pub amount: f64,
    #[serde(with = "iso_millis")]
    pub requested_at: DateTime<Utc>,
}

impl Payment {
    /// ISO-8601 UTC with millisecond precision, e.g. `2025-07-30T12:34:56.789Z`.
    pub fn requested_at_iso(&self) -> String {
        self.requested_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// What the write queue persists once an upstream call has resolved.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub payment: Payment,
    pub default_service: bool,
    pub processed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentAccepted {
    pub message: String,
    pub payment: Payment,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn missing(field: &str) -> Self {
        Self {
            message: format!("Invalid params. Missing '{field}'"),
        }
    }
}

pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
