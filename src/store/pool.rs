use anyhow::{bail, Context, Result};
use sqlx::{Connection, SqliteConnection};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

/// Bounded pool of raw SQLite handles. Handles are minted lazily up to
/// `max_handles`; once all are leased, callers park FIFO until a release,
/// with at most `max_waiters` of them queued at a time.
pub struct HandlePool {
    database_url: String,
    max_handles: usize,
    max_waiters: usize,
    state: Mutex<PoolState>,
}

struct PoolState {
    ready: Vec<SqliteConnection>,
    minted: usize,
    waiters: VecDeque<oneshot::Sender<SqliteConnection>>,
    closed: bool,
}

enum Claim {
    Ready(SqliteConnection),
    Mint,
    Wait(oneshot::Receiver<SqliteConnection>),
}

impl HandlePool {
    pub fn new(database_url: impl Into<String>, max_handles: usize, max_waiters: usize) -> Arc<Self> {
        Arc::new(Self {
            database_url: database_url.into(),
            max_handles,
            max_waiters,
            state: Mutex::new(PoolState {
                ready: Vec::new(),
                minted: 0,
                waiters: VecDeque::new(),
                closed: false,
            }),
        })
    }

    /// Leases a handle, parking the caller when all handles are out.
    /// Fails fast once the waiter queue is full or the pool is shut down.
    pub async fn acquire(self: &Arc<Self>) -> Result<PooledHandle> {
        let claim = {
            let mut state = self.lock();
            if state.closed {
                bail!("handle pool is shut down");
            }
            if let Some(conn) = state.ready.pop() {
                Claim::Ready(conn)
            } else if state.minted < self.max_handles {
                // Reserve the slot before awaiting the connect.
                state.minted += 1;
                Claim::Mint
            } else if state.waiters.len() < self.max_waiters {
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                Claim::Wait(rx)
            } else {
                bail!(
                    "handle pool exhausted: {} handles leased, {} callers already queued",
                    self.max_handles,
                    self.max_waiters
                );
            }
        };

        let conn = match claim {
            Claim::Ready(conn) => conn,
            Claim::Mint => match self.mint().await {
                Ok(conn) => conn,
                Err(err) => {
                    self.lock().minted -= 1;
                    return Err(err);
                }
            },
            Claim::Wait(rx) => rx.await.context("handle pool shut down while waiting")?,
        };

        Ok(PooledHandle {
            conn: Some(conn),
            pool: Arc::clone(self),
        })
    }

    /// Closes idle handles and fails queued waiters; outstanding leases
    /// are discarded as they come back. Further `acquire` calls fail
    /// immediately.
    pub async fn shutdown(&self) {
        let (ready, waiters) = {
            let mut state = self.lock();
            state.closed = true;
            let drained = std::mem::take(&mut state.ready);
            state.minted -= drained.len();
            (drained, std::mem::take(&mut state.waiters))
        };

        // Dropping the senders wakes every parked caller with an error.
        drop(waiters);

        for conn in ready {
            if let Err(err) = conn.close().await {
                tracing::warn!("closing pooled sqlite handle: {err}");
            }
        }
    }

    fn release(&self, mut conn: SqliteConnection) {
        let mut state = self.lock();
        if state.closed {
            state.minted -= 1;
            return;
        }

        while let Some(waiter) = state.waiters.pop_front() {
            match waiter.send(conn) {
                Ok(()) => return,
                // The waiter gave up; hand the connection to the next one.
                Err(returned) => conn = returned,
            }
        }

        state.ready.push(conn);
    }

    async fn mint(&self) -> Result<SqliteConnection> {
        let mut conn = SqliteConnection::connect(&self.database_url)
            .await
            .with_context(|| format!("open sqlite handle at {}", self.database_url))?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&mut conn)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&mut conn)
            .await?;

        Ok(conn)
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// RAII lease on a pooled handle. The handle goes back to the pool on
/// drop, on every exit path.
pub struct PooledHandle {
    conn: Option<SqliteConnection>,
    pool: Arc<HandlePool>,
}

impl std::ops::Deref for PooledHandle {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref().expect("handle only taken on drop")
    }
}

impl std::ops::DerefMut for PooledHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().expect("handle only taken on drop")
    }
}

impl Drop for PooledHandle {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
