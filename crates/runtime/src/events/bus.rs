//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use battle_core::{BattleEvent, EndReason, SessionId, SessionMode, Winner};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle events from duels
    Duel,
    /// Battle events from raids
    Raid,
    /// Session creation, cancellation, and settlement
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Duel, Topic::Raid, Topic::Lifecycle];
}

/// A battle event tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: BattleEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    LobbyOpened {
        session: SessionId,
    },
    /// Character selection timed out; no outcome is applied.
    LobbyCancelled {
        session: SessionId,
    },
    SessionStarted {
        session: SessionId,
        mode: SessionMode,
    },
    /// The outcome has been handed to the account layer and the session has
    /// left the registry.
    SessionSettled {
        session: SessionId,
        mode: SessionMode,
        winner: Option<Winner>,
        reason: EndReason,
    },
}

impl LifecycleEvent {
    pub fn session(&self) -> SessionId {
        match self {
            LifecycleEvent::LobbyOpened { session }
            | LifecycleEvent::LobbyCancelled { session }
            | LifecycleEvent::SessionStarted { session, .. }
            | LifecycleEvent::SessionSettled { session, .. } => *session,
        }
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Duel(SessionEvent),
    Raid(SessionEvent),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Duel(_) => Topic::Duel,
            Event::Raid(_) => Topic::Raid,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }

    pub fn session(&self) -> SessionId {
        match self {
            Event::Duel(inner) | Event::Raid(inner) => inner.session,
            Event::Lifecycle(inner) => inner.session(),
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. The topic set is fixed at construction, so the
/// channel map is shared without a lock.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Best-effort: with no subscribers the event is dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Unreachable while every topic is created up front; hand out a
            // closed receiver rather than panic.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
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

    fn lobby(session: u64) -> Event {
        Event::Lifecycle(LifecycleEvent::LobbyOpened {
            session: SessionId(session),
        })
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut duel = bus.subscribe(Topic::Duel);

        bus.publish(lobby(4));

        let received = lifecycle.recv().await.unwrap();
        assert_eq!(received.session(), SessionId(4));
        assert!(duel.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(lobby(1));
        let clone = bus.clone();
        let receivers = clone.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), 3);
    }
}
