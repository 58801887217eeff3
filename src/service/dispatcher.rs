use crate::domain::health::Upstream;
use crate::domain::payment::{
    CreatePaymentRequest, ErrorBody, Payment, PaymentAccepted, PaymentRecord,
};
use crate::health::registry::HealthRegistry;
use crate::processors::ProcessorClient;
use crate::router::{self, Route};
use crate::service::writer::PaymentWriter;
use axum::http::StatusCode;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentDispatcher {
    pub processors: Arc<dyn ProcessorClient>,
    pub registry: Arc<HealthRegistry>,
    pub writer: PaymentWriter,
}

impl PaymentDispatcher {
    /// Validates the body, routes to one upstream from a single health
    /// read, submits, and enqueues the outcome before answering. The
    /// routing decision is final for the request; there is no crossover
    /// to the other upstream.
    pub async fn dispatch(
        &self,
        req: CreatePaymentRequest,
    ) -> Result<PaymentAccepted, (StatusCode, ErrorBody)> {
        let start = Instant::now();

        if req.correlation_id.as_deref().map_or(true, str::is_empty) {
            return Err((StatusCode::BAD_REQUEST, ErrorBody::missing("correlationId")));
        }
        let amount = req
            .amount
            .ok_or((StatusCode::BAD_REQUEST, ErrorBody::missing("amount")))?;

        let payment = Payment {
            correlation_id: Uuid::new_v4().to_string(),
            amount,
            requested_at: Utc::now(),
        };

        let view = self.registry.read().await;
        let upstream = match router::choose(&view) {
            Route::Default => Upstream::Default,
            Route::Fallback => Upstream::Fallback,
            Route::Unavailable => {
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Erro interno do servidor"),
                ));
            }
        };

        let outcome = match self.processors.submit_payment(upstream, &payment).await {
            Ok(reply) => {
                self.writer.enqueue(PaymentRecord {
                    payment: payment.clone(),
                    default_service: upstream == Upstream::Default,
                    processed: reply.accepted,
                });

                if reply.accepted {
                    Ok(PaymentAccepted {
                        message: reply.message,
                        payment,
                    })
                } else {
                    Err((StatusCode::BAD_REQUEST, ErrorBody::new(reply.message)))
                }
            }
            Err(err) => {
                // Failed in transit, so nothing to record for this dispatch.
                tracing::warn!("dispatch to {} failed in transit: {err:#}", upstream.as_str());
                Err((
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("payment processor unreachable"),
                ))
            }
        };

        tracing::debug!(
            upstream = upstream.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            accepted = outcome.is_ok(),
            "payment dispatched"
        );

        outcome
    }
}
