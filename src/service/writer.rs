use crate::domain::payment::PaymentRecord;
use crate::store::payments::PaymentsStore;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Producer handle to the durable write queue. Enqueue never blocks; a
/// single consumer task owns persistence and consumes in FIFO order.
#[derive(Clone)]
pub struct PaymentWriter {
    tx: mpsc::UnboundedSender<PaymentRecord>,
}

pub struct WriterHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PaymentWriter {
    pub fn spawn(store: PaymentsStore) -> (PaymentWriter, WriterHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(consume(store, rx, stop_rx));

        (PaymentWriter { tx }, WriterHandle { stop_tx, join })
    }

    pub fn enqueue(&self, record: PaymentRecord) {
        if self.tx.send(record).is_err() {
            tracing::error!("payment writer is gone, dropping record");
        }
    }
}

impl WriterHandle {
    /// Signals shutdown, lets the consumer drain what is already queued,
    /// and joins it.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(err) = self.join.await {
            tracing::error!("payment writer task failed: {err}");
        }
    }
}

async fn consume(
    store: PaymentsStore,
    mut rx: mpsc::UnboundedReceiver<PaymentRecord>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            item = rx.recv() => match item {
                Some(record) => persist(&store, record).await,
                None => break,
            },
            _ = stop_rx.changed() => {
                while let Ok(record) = rx.try_recv() {
                    persist(&store, record).await;
                }
                break;
            }
        }
    }
}

async fn persist(store: &PaymentsStore, record: PaymentRecord) {
    // At-most-once: a failed insert is logged and dropped, the client
    // already has its answer.
    if let Err(err) = store.insert(&record).await {
        tracing::error!(
            correlation_id = %record.payment.correlation_id,
            "persisting payment failed: {err:#}"
        );
    }
}
