//! Real-time dashboard events.
//!
//! Producers publish onto a broadcast channel; each WebSocket client holds its
//! own receiver. Publishing with no connected clients is not an error.

pub mod handlers;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::lead::LeadRow;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum LeadEvent {
    NewLead(LeadRow),
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LeadEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: LeadEvent) {
        let receivers = self.sender.send(event).unwrap_or(0);
        debug!("Published lead event to {receivers} subscriber(s)");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LeadEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::fixtures::sample_lead;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(LeadEvent::NewLead(sample_lead()));

        let LeadEvent::NewLead(lead) = rx.recv().await.unwrap();
        assert_eq!(lead.id, 7);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        EventBus::new().publish(LeadEvent::NewLead(sample_lead()));
    }

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(LeadEvent::NewLead(sample_lead())).unwrap();
        assert_eq!(json["event"], "new-lead");
        assert_eq!(json["data"]["profile_name"], "Acme");
    }
}
