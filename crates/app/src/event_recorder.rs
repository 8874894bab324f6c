//! Event recorder: persists every event seen on the bus.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use playguard_domain::event::Event;

use crate::ports::EventStore;

/// Subscribes to the event bus and appends each event to an [`EventStore`].
pub struct EventRecorder<ES> {
    store: ES,
}

impl<ES: EventStore> EventRecorder<ES> {
    pub fn new(store: ES) -> Self {
        Self { store }
    }

    /// Record events until the channel closes.
    pub async fn run(&self, mut receiver: broadcast::Receiver<Event>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let event_id = event.id;
                    if let Err(err) = self.store.store(event).await {
                        tracing::warn!(error = %err, %event_id, "failed to record event");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event recorder lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
