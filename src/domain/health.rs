use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the two external payment processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Default,
    Fallback,
}

impl Upstream {
    pub const ALL: [Upstream; 2] = [Upstream::Default, Upstream::Fallback];

    pub fn as_str(self) -> &'static str {
        match self {
            Upstream::Default => "default",
            Upstream::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub failing: bool,
    pub min_response_time: u64,
    pub last_check: DateTime<Utc>,
}

impl HealthSnapshot {
    /// Initial state before the first probe lands.
    pub fn new() -> Self {
        Self {
            failing: false,
            min_response_time: 0,
            last_check: Utc::now(),
        }
    }
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Both upstream snapshots, always read together so no caller sees a
/// torn pair.
#[derive(Debug, Clone)]
pub struct HealthView {
    pub default: HealthSnapshot,
    pub fallback: HealthSnapshot,
}

impl HealthView {
    pub fn new() -> Self {
        Self {
            default: HealthSnapshot::new(),
            fallback: HealthSnapshot::new(),
        }
    }

}

impl Default for HealthView {
    fn default() -> Self {
        Self::new()
    }
}
