use tokio::sync::broadcast;

use tinig_types::events::SkyEvent;

/// Fans sky events out to every connected browser.
#[derive(Clone)]
pub struct Dispatcher {
    broadcast_tx: broadcast::Sender<SkyEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self { broadcast_tx }
    }

    /// Subscribe to sky events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<SkyEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients. Having no listeners is
    /// not an error.
    pub fn broadcast(&self, event: SkyEvent) {
        let _ = self.broadcast_tx.send(event);
    }

    /// Number of live subscriptions.
    pub fn listeners(&self) -> usize {
        self.broadcast_tx.receiver_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
