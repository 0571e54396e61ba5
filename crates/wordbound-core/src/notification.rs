//! One-way notifications emitted by the narrative core.
//!
//! UI badge and notification logic subscribes here; the core never
//! depends on a subscriber being present. The bus is owned by the
//! session object and passed by reference, so there is no ambient
//! dispatch and no framework event system involved.

use crate::beat::StoryBeat;
use crate::ids::{ContentId, TriggerId};

/// A one-way signal published to external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The story advanced to a new beat.
    BeatChanged {
        /// Beat before the advancement.
        previous: StoryBeat,
        /// Beat after the advancement.
        current: StoryBeat,
    },
    /// A trigger fired and unlocked a blurb.
    ContentUnlocked {
        /// The unlocked blurb.
        content_id: ContentId,
        /// The trigger that unlocked it.
        trigger: TriggerId,
    },
    /// The dialogue queue emptied after having shown content.
    QueueDrained,
}

/// Subscriber callback registered with a [`NotificationBus`].
pub type Subscriber = Box<dyn FnMut(&Notification) + Send>;

/// A minimal typed publish/subscribe channel.
///
/// Subscribers are plain callbacks invoked synchronously in registration
/// order. Publishing with no subscribers is a no-op.
#[derive(Default)]
pub struct NotificationBus {
    subscribers: Vec<Subscriber>,
}

impl NotificationBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for all future notifications.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Delivers `notification` to every subscriber.
    pub fn publish(&mut self, notification: &Notification) {
        for subscriber in &mut self.subscribers {
            subscriber(notification);
        }
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
