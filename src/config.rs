#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub processor_default_url: String,
    pub processor_fallback_url: String,
    pub admin_token: String,
    pub max_handles: usize,
    pub max_waiters: usize,
    pub probe_interval_secs: u64,
    pub outbound_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9999".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://payments.db?mode=rwc".to_string()),
            processor_default_url: std::env::var("PROCESSOR_DEFAULT_URL")
                .unwrap_or_else(|_| "http://payment-processor-default:8080".to_string()),
            processor_fallback_url: std::env::var("PROCESSOR_FALLBACK_URL")
                .unwrap_or_else(|_| "http://payment-processor-fallback:8080".to_string()),
            admin_token: std::env::var("PROCESSOR_ADMIN_TOKEN")
                .unwrap_or_else(|_| "123".to_string()),
            max_handles: env_parsed("DB_MAX_HANDLES", 10),
            max_waiters: env_parsed("DB_MAX_WAITERS", 50),
            probe_interval_secs: env_parsed("HEALTH_PROBE_INTERVAL_SECS", 5),
            outbound_timeout_secs: env_parsed("PROCESSOR_TIMEOUT_SECS", 7),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}
