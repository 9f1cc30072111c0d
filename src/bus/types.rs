use crate::core::types::{Notification, RawMessage};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::broadcast;

// ---------- Topic trait (broadcast semantics) ----------
#[async_trait::async_trait]
pub trait Topic<T>: Sync + Send + 'static {
    /// Publish a message to all subscribers.
    async fn publish(&self, msg: T) -> Result<()>;

    /// Subscribe to the stream (each subscriber has an independent cursor).
    fn subscribe(&self) -> broadcast::Receiver<Arc<T>>;
}

// --- Broadcast topic: 1->N fanout (lossy under lag). Payloads ride in Arc<T>
// so subscribers never clone T itself.
pub struct BroadcastTopic<T: Clone + Send + Sync + 'static> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Clone + Send + Sync + 'static> BroadcastTopic<T> {
    pub fn with_capacity(cap: usize) -> Self {
        let (tx, _rx) = broadcast::channel(cap);
        Self { tx }
    }
}

#[async_trait]
impl<T: Debug + Clone + Send + Sync + 'static> Topic<T> for BroadcastTopic<T> {
    async fn publish(&self, msg: T) -> Result<()> {
        // Send only errors when there are no receivers; that is not fatal.
        let _ = self.tx.send(Arc::new(msg));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

#[derive(Clone)]
pub struct Bus {
    /// Inbound chat messages, in arrival order.
    pub raw_messages: Arc<dyn Topic<RawMessage>>,
    /// Formatted notifications ready for routing.
    pub notifications: Arc<dyn Topic<Notification>>,
}

impl Bus {
    pub fn new() -> Self {
        let cap = 1024;

        Self {
            raw_messages: Arc::new(BroadcastTopic::<RawMessage>::with_capacity(cap)),
            notifications: Arc::new(BroadcastTopic::<Notification>::with_capacity(cap)),
        }
    }
}
