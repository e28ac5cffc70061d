use tokio::sync::broadcast;

/// Topics other views subscribe to in order to refetch after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    MembersChanged,
    ContractsChanged,
    MandatesChanged,
    AttendanceChanged,
}

/// Broadcast bus for cross-view invalidation.
///
/// A successful write publishes the matching topic; every open view holds a
/// receiver and refetches when its topic arrives. Lagging receivers miss
/// events rather than blocking publishers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Publishes an event. A bus without subscribers drops the event silently.
    pub fn publish(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!(?event, "No subscribers for event");
        }
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

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx_a = bus.subscribe();
        let mut rx_b = bus.subscribe();

        bus.publish(AppEvent::MembersChanged);

        assert_eq!(rx_a.recv().await.unwrap(), AppEvent::MembersChanged);
        assert_eq!(rx_b.recv().await.unwrap(), AppEvent::MembersChanged);
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new();
        bus.publish(AppEvent::ContractsChanged);
    }
}
