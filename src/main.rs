use axum::routing::{get, post};
use axum::Router;
use payment_broker::config::AppConfig;
use payment_broker::health::prober::HealthProber;
use payment_broker::health::registry::HealthRegistry;
use payment_broker::processors::http::HttpProcessorClient;
use payment_broker::processors::ProcessorClient;
use payment_broker::service::dispatcher::PaymentDispatcher;
use payment_broker::service::summary::SummaryService;
use payment_broker::service::writer::PaymentWriter;
use payment_broker::store::health::HealthStore;
use payment_broker::store::payments::PaymentsStore;
use payment_broker::store::pool::HandlePool;
use payment_broker::store::schema;
use payment_broker::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = HandlePool::new(&cfg.database_url, cfg.max_handles, cfg.max_waiters);
    schema::init(&pool).await?;

    let payments = PaymentsStore {
        pool: Arc::clone(&pool),
    };
    let health_store = HealthStore {
        pool: Arc::clone(&pool),
    };

    let registry = HealthRegistry::seeded(health_store.load().await?);

    let timeout = Duration::from_secs(cfg.outbound_timeout_secs);
    let processors: Arc<dyn ProcessorClient> = Arc::new(HttpProcessorClient {
        default_url: cfg.processor_default_url.clone(),
        fallback_url: cfg.processor_fallback_url.clone(),
        admin_token: cfg.admin_token.clone(),
        timeout,
        client: reqwest::Client::builder().connect_timeout(timeout).build()?,
    });

    let (writer, writer_handle) = PaymentWriter::spawn(payments.clone());

    let prober = HealthProber {
        processors: Arc::clone(&processors),
        registry: Arc::clone(&registry),
        store: health_store,
        cadence: Duration::from_secs(cfg.probe_interval_secs),
    };
    tokio::spawn(prober.run());

    let state = AppState {
        dispatcher: PaymentDispatcher {
            processors: Arc::clone(&processors),
            registry,
            writer,
        },
        summary: SummaryService {
            processors,
            store: payments.clone(),
        },
        payments,
    };

    let app = Router::new()
        .route(
            "/payments",
            post(payment_broker::http::handlers::payments::create_payment),
        )
        .route(
            "/payments-summary",
            get(payment_broker::http::handlers::summary::payments_summary),
        )
        .route(
            "/purge-payments",
            post(payment_broker::http::handlers::payments::purge_payments),
        )
        .fallback(payment_broker::http::handlers::payments::not_found)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("payment broker listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;

    writer_handle.stop().await;
    Ok(())
}
