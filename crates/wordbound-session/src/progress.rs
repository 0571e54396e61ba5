//! The persisted session progress snapshot.
//!
//! `SessionProgress` is an immutable value: every mutation returns a new
//! snapshot, which keeps the evaluator's before/after comparisons sound.
//! Only the trigger evaluator and the bitmap codec paths mutate it;
//! callers are responsible for serializing writes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wordbound_core::beat::StoryBeat;
use wordbound_core::clock::Clock;
use wordbound_core::error::DomainError;
use wordbound_core::ids::{BookId, ContentId, TriggerId};
use wordbound_progress::bitmap;

/// Persisted progress for one play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    /// Current story beat.
    pub current_story_beat: StoryBeat,
    /// Unlocked blurbs; unique, insertion order is unlock order.
    pub unlocked_content_ids: Vec<ContentId>,
    /// Triggers that have fired.
    pub fired_triggers: BTreeSet<TriggerId>,
    /// The most recently unlocked blurb, if any.
    pub current_content_id: Option<ContentId>,
    /// Timestamp of the last mutation.
    pub last_updated: DateTime<Utc>,
    /// Per-book part-completion bitmaps.
    pub book_bitmaps: BTreeMap<BookId, u32>,
}

impl SessionProgress {
    /// New-game defaults: initial beat, nothing unlocked, nothing fired.
    #[must_use]
    pub fn new_game(clock: &dyn Clock) -> Self {
        Self {
            current_story_beat: StoryBeat::initial(),
            unlocked_content_ids: Vec::new(),
            fired_triggers: BTreeSet::new(),
            current_content_id: None,
            last_updated: clock.now(),
            book_bitmaps: BTreeMap::new(),
        }
    }

    /// Whether any content has ever been unlocked.
    #[must_use]
    pub fn has_unlocked_content(&self) -> bool {
        !self.unlocked_content_ids.is_empty()
    }

    /// Whether `trigger` has fired.
    #[must_use]
    pub fn has_fired(&self, trigger: &TriggerId) -> bool {
        self.fired_triggers.contains(trigger)
    }

    /// The stored bitmap for `book`; empty for an untouched book.
    #[must_use]
    pub fn bitmap_for(&self, book: &BookId) -> u32 {
        self.book_bitmaps
            .get(book)
            .copied()
            .unwrap_or_else(bitmap::create_empty)
    }

    /// Snapshot at `beat`.
    #[must_use]
    pub fn with_story_beat(&self, beat: StoryBeat, clock: &dyn Clock) -> Self {
        Self {
            current_story_beat: beat,
            last_updated: clock.now(),
            ..self.clone()
        }
    }

    /// Snapshot with `content_id` unlocked by `trigger`.
    ///
    /// Appending is idempotent: an already-unlocked id is not duplicated,
    /// but the trigger is still recorded and the current-content pointer
    /// still moves.
    #[must_use]
    pub fn with_unlock(&self, content_id: ContentId, trigger: TriggerId, clock: &dyn Clock) -> Self {
        let mut next = self.clone();
        if !next.unlocked_content_ids.contains(&content_id) {
            next.unlocked_content_ids.push(content_id.clone());
        }
        next.fired_triggers.insert(trigger);
        next.current_content_id = Some(content_id);
        next.last_updated = clock.now();
        next
    }

    /// Snapshot with part `index` of `book` marked complete.
    ///
    /// Out-of-range indices leave the bitmap unchanged (the codec's
    /// no-op contract), though the timestamp still refreshes.
    #[must_use]
    pub fn with_part_completed(&self, book: &BookId, index: u32, clock: &dyn Clock) -> Self {
        let mut next = self.clone();
        let updated = bitmap::set_part(next.bitmap_for(book), index);
        next.book_bitmaps.insert(book.clone(), updated);
        next.last_updated = clock.now();
        next
    }

    /// Snapshot with every stored bitmap masked to its book's current
    /// part count.
    ///
    /// Applied on load to defend against books whose part count shrank
    /// after a data edit. Books absent from `part_counts` keep their
    /// stored bitmap untouched. The timestamp is not refreshed: sanitizing
    /// is repair, not progress.
    #[must_use]
    pub fn sanitized(&self, part_counts: &BTreeMap<BookId, u32>) -> Self {
        let mut next = self.clone();
        for (book, stored) in &mut next.book_bitmaps {
            if let Some(&total_parts) = part_counts.get(book) {
                if !bitmap::validate(*stored, total_parts) {
                    debug!(book = %book, "sanitizing bitmap with bits above the part count");
                    *stored = bitmap::sanitize(*stored, total_parts);
                }
            }
        }
        next
    }

    /// Serializes the snapshot to the persisted payload format.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("SessionProgress serialization is infallible")
    }

    /// Deserializes a snapshot from the persisted payload format.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload does not
    /// match the expected shape.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(payload).map_err(|e| {
            DomainError::Infrastructure(format!("session payload deserialization failed: {e}"))
        })
    }
}
