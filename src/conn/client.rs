use super::Hub;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Server side handle of one connected peer.
///
/// Clones share the same outbound queue and shutdown signal.
#[derive(Clone)]
pub struct Client {
    id: Uuid,
    name: Arc<str>,
    tx: mpsc::Sender<String>,
    closing: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Client {
    pub fn new(name: &str, tx: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Arc::from(name),
            tx,
            closing: Arc::new(AtomicBool::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue an encoded message without waiting.
    ///
    /// Returns false when the queue is closed or full, the message is dropped.
    pub fn send(&self, msg: String) -> bool {
        if self.shutdown.is_cancelled() {
            return false;
        }
        match self.tx.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("outbound queue of {} is full, message dropped", self.name);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Resolves once the client has been torn down
    pub async fn closed(&self) {
        self.shutdown.cancelled().await
    }

    /// Tear the client down: leave the hub and every room, then close the queue.
    ///
    /// Only the first call does the work, later calls return false.
    pub async fn disconnect(&self, hub: &Hub) -> bool {
        if self.closing.swap(true, Ordering::AcqRel) {
            return false;
        }

        if let Err(e) = hub.disconnect(self).await {
            tracing::error!("failed to unregister {}: {}", self.name, e);
        }
        self.shutdown.cancel();

        tracing::debug!("client disconnected {}:{}", self.name, self.id);
        true
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
