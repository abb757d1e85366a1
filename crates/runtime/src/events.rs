//! Topic-based event bus between game workers and the transport layer.
//!
//! Workers publish what happened; transport adapters subscribe to the
//! topics they render (announcements into chat, cell updates into the
//! board channel, role changes onto member records). Delivery is
//! best-effort: a topic with no subscribers simply drops events.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use tactics_core::{Board, ColorPair, PlayerId, Position};

use crate::types::{GameKey, RoleKind};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Human-readable lines for the game's announcement channel.
    Announcement,
    /// Incremental board rendering updates.
    Board,
    /// Player/juror role transitions.
    Role,
}

/// Event wrapper that carries the originating game and the payload.
#[derive(Debug, Clone)]
pub enum Event {
    Announcement {
        key: GameKey,
        text: String,
    },
    /// A fresh board exists; render it from scratch.
    BoardCreated {
        key: GameKey,
        board: Board,
        tanks: Vec<(Position, ColorPair)>,
    },
    CellFilled {
        key: GameKey,
        position: Position,
        color: ColorPair,
    },
    CellCleared {
        key: GameKey,
        position: Position,
    },
    RoleGranted {
        key: GameKey,
        player: PlayerId,
        role: RoleKind,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Announcement { .. } => Topic::Announcement,
            Event::BoardCreated { .. } | Event::CellFilled { .. } | Event::CellCleared { .. } => {
                Topic::Board
            }
            Event::RoleGranted { .. } => Topic::Role,
        }
    }
}

/// Topic-based event bus.
///
/// Channels are created up front, one per topic, so publishing never
/// allocates and cloning the bus is cheap.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    const TOPICS: [Topic; 3] = [Topic::Announcement, Topic::Board, Topic::Role];

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Self::TOPICS
            .iter()
            .map(|&topic| (topic, broadcast::channel(capacity).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic. Normal, not an error.
            tracing::trace!(?topic, "no subscribers for topic");
        }
    }

    /// Subscribe to a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[&topic].subscribe()
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

    fn key() -> GameKey {
        GameKey::new("g", "test")
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut announcements = bus.subscribe(Topic::Announcement);
        let mut board = bus.subscribe(Topic::Board);

        bus.publish(Event::Announcement {
            key: key(),
            text: "hello".into(),
        });
        bus.publish(Event::CellCleared {
            key: key(),
            position: Position::ORIGIN,
        });

        assert!(matches!(
            announcements.recv().await.unwrap(),
            Event::Announcement { .. }
        ));
        assert!(matches!(
            board.recv().await.unwrap(),
            Event::CellCleared { .. }
        ));
        assert!(announcements.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Announcement {
            key: key(),
            text: "nobody listening".into(),
        });
    }
}
