//! Outbox dispatch worker
//!
//! Polls the notification table for undispatched rows, hands them to the
//! delivery sink and stamps them dispatched. Transport beyond "handed over
//! and stamped" is the delivery platform's concern.

use crate::db::repository::notification;
use shared::models::Notification;
use sqlx::SqlitePool;
use std::time::Duration;

/// Rows fetched per sweep
const BATCH_SIZE: i32 = 50;

/// Sweep interval
const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct OutboxWorker {
    pool: SqlitePool,
}

impl OutboxWorker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Spawn the dispatch loop as a background task.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Notification outbox worker started");
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(e) = self.drain().await {
                    tracing::error!("Outbox sweep failed: {:?}", e);
                }
            }
        })
    }

    /// Dispatch every pending row once. Returns the number dispatched.
    pub async fn drain(&self) -> Result<usize, crate::db::repository::RepoError> {
        let pending = notification::find_undispatched(&self.pool, BATCH_SIZE).await?;
        let mut dispatched = 0usize;
        for n in &pending {
            deliver(n);
            // Idempotent stamp: a row raced away by another worker is fine
            if notification::mark_dispatched(&self.pool, n.id).await? {
                dispatched += 1;
            }
        }
        if dispatched > 0 {
            tracing::debug!(count = dispatched, "Notifications dispatched");
        }
        Ok(dispatched)
    }
}

/// Hand a notification to the delivery sink.
fn deliver(n: &Notification) {
    tracing::info!(
        user_id = n.user_id,
        kind = ?n.kind,
        related_id = n.related_id,
        title = %n.title,
        "notification"
    );
}
