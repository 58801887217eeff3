pub mod config;
pub mod domain {
    pub mod health;
    pub mod payment;
}
pub mod health {
    pub mod prober;
    pub mod registry;
}
pub mod http {
    pub mod handlers {
        pub mod payments;
        pub mod summary;
    }
}
pub mod processors;
pub mod router;
pub mod service {
    pub mod dispatcher;
    pub mod summary;
    pub mod writer;
}
pub mod store {
    pub mod health;
    pub mod payments;
    pub mod pool;
    pub mod schema;
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: service::dispatcher::PaymentDispatcher,
    pub summary: service::summary::SummaryService,
    pub payments: store::payments::PaymentsStore,
}
