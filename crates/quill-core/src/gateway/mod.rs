//! Gateway abstractions for the chat session
//!
//! The core never talks to a chat transport directly. It consumes
//! [`GatewayEvent`]s from a broadcast-based [`Gateway`] bus and delivers
//! replies through a [`ReplySink`]. Establishing the session, reconnect and
//! backoff all live behind these seams.

mod reply;
mod types;

pub use reply::{Embed, EmbedAuthor, EmbedField, ReplySink};
pub use types::{ChannelRef, GuildRef, Message, MessageKind, UserRef};

use tokio::sync::broadcast;

/// Events delivered by the chat session
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// A message was created in a channel the bot can see
    MessageCreated(Message),

    /// The session came up
    Connected { account: UserRef },

    /// The session went down
    Disconnected { reason: Option<String> },
}

impl GatewayEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MessageCreated(_) => "message_created",
            Self::Connected { .. } => "connected",
            Self::Disconnected { .. } => "disconnected",
        }
    }
}

/// Broadcast bus carrying gateway events to subscribers
///
/// Each subscriber receives a copy of every published event. The dispatcher
/// subscribes exactly once at initialization; additional subscribers (loggers,
/// presence trackers) are free to attach without coordinating with it.
#[derive(Debug)]
pub struct Gateway {
    sender: broadcast::Sender<GatewayEvent>,
    capacity: usize,
}

impl Gateway {
    /// Create a new gateway bus with the specified buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of active receivers, 0 if nobody is listening.
    pub fn publish(&self, event: GatewayEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Gateway {
    /// Create a default gateway bus buffering 256 events
    fn default() -> Self {
        Self::new(256)
    }
}

impl Clone for Gateway {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> Message {
        Message::regular(
            1,
            UserRef::new(10, "alice"),
            ChannelRef::new(20, "general"),
            GuildRef::new(30, "testers", 10),
            "hello",
        )
    }

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let gateway = Gateway::new(16);
        let mut rx = gateway.subscribe();

        let sent = gateway.publish(GatewayEvent::MessageCreated(sample_message()));
        assert_eq!(sent, 1);

        let event = rx.recv().await.unwrap();
        match event {
            GatewayEvent::MessageCreated(msg) => assert_eq!(msg.content, "hello"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_dropped() {
        let gateway = Gateway::new(16);
        let sent = gateway.publish(GatewayEvent::Disconnected { reason: None });
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn cloned_bus_shares_subscribers() {
        let gateway = Gateway::default();
        let clone = gateway.clone();
        let mut rx = gateway.subscribe();

        clone.publish(GatewayEvent::Connected {
            account: UserRef::new(1, "quill"),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "connected");
        assert_eq!(gateway.subscriber_count(), 1);
    }
}
