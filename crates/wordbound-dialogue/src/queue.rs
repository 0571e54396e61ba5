//! The two-slot animated dialogue queue.
//!
//! Entries become visible in submission order, at most two at a time
//! ("top" = oldest, "bottom" = newest). Animated transitions are
//! modeled as deadline records completed by [`DialogueQueue::tick`];
//! each record carries the generation it was scheduled under, and a
//! record whose generation is no longer current is dropped without
//! touching state. That staleness check is the cancellation mechanism —
//! there is no explicit cancel API.
//!
//! While a transition is in flight a cooperative boolean lock is held:
//! `enqueue` buffers (keeping only the most recent submission) and
//! `advance` is a no-op. The lock is never an OS primitive; everything
//! here runs on one logical thread.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use wordbound_core::error::DomainError;
use wordbound_core::ids::ContentId;

use crate::entry::{AnimationState, DialogueEntry};

/// Maximum number of concurrently visible entries.
pub const MAX_VISIBLE: usize = 2;

/// Duration of one animation phase (enter, shift or exit), in
/// milliseconds.
pub const PHASE_MILLIS: i64 = 500;

/// Stagger between slot animations within one transition, in
/// milliseconds.
pub const STAGGER_MILLIS: i64 = 100;

fn phase() -> Duration {
    Duration::milliseconds(PHASE_MILLIS)
}

fn stagger() -> Duration {
    Duration::milliseconds(STAGGER_MILLIS)
}

/// A visible slot: the entry plus its animation state.
#[derive(Debug, Clone)]
pub struct Slot {
    /// The entry occupying the slot.
    pub entry: DialogueEntry,
    /// Current animation state.
    pub state: AnimationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotFinish {
    Enter,
    Shift,
    Exit,
}

#[derive(Debug, Clone)]
struct ScheduledFinish {
    fire_at: DateTime<Utc>,
    generation: u64,
    entry_id: ContentId,
    finish: SlotFinish,
}

/// Signals surfaced to the caller through the outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueSignal {
    /// The newest entry had no chunks left on `advance`; the caller
    /// decides whether to enqueue a replacement or end the session.
    EntryFinished {
        /// The finished entry.
        id: ContentId,
    },
    /// The queue went from showing content to empty with nothing
    /// pending.
    Drained,
}

/// Outcome of an `enqueue` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// A transition started immediately.
    Started,
    /// A transition was in flight; the entry was buffered as pending.
    Buffered,
}

/// Outcome of an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    /// Ignored: a transition is in flight or nothing is visible.
    Ignored,
    /// The newest entry revealed its next chunk.
    ChunkRevealed,
    /// No chunks remained; `EntryFinished` was signalled.
    Finished,
}

/// The dialogue queue state machine.
#[derive(Debug, Default)]
pub struct DialogueQueue {
    /// Visible slots, oldest first. At most [`MAX_VISIBLE`] committed
    /// entries; one extra slot may linger while its exit animates.
    visible: Vec<Slot>,
    /// Entry buffered while a transition is in flight; last writer wins.
    pending: Option<DialogueEntry>,
    /// Cooperative transition lock.
    locked: bool,
    /// Bumped by `clear` and by each new transition; stales old records.
    generation: u64,
    /// Outstanding timed completions.
    scheduled: Vec<ScheduledFinish>,
    /// Whether content has been visible since the last drained signal.
    shown_since_drain: bool,
    /// Signals awaiting collection by the caller.
    signals: Vec<DialogueSignal>,
}

impl DialogueQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible slots, oldest ("top") first.
    #[must_use]
    pub fn visible(&self) -> &[Slot] {
        &self.visible
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The buffered pending entry, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&DialogueEntry> {
        self.pending.as_ref()
    }

    /// Drains the signal outbox.
    pub fn take_signals(&mut self) -> Vec<DialogueSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Submits an entry for presentation.
    ///
    /// If a transition is in flight the entry is buffered as pending —
    /// only the most recently submitted pending entry is retained — and
    /// processed as soon as the in-flight transition's cleanup
    /// completes. Otherwise a transition starts immediately.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an entry with an empty id
    /// or no chunks, or whose id is already visible. Rejection leaves
    /// the queue untouched.
    pub fn enqueue(
        &mut self,
        entry: DialogueEntry,
        now: DateTime<Utc>,
    ) -> Result<Enqueued, DomainError> {
        if entry.id.is_empty() {
            warn!("rejecting dialogue entry with empty id");
            return Err(DomainError::Validation(
                "dialogue entry id must not be empty".to_owned(),
            ));
        }
        if entry.chunks.is_empty() {
            warn!(id = %entry.id, "rejecting dialogue entry with no chunks");
            return Err(DomainError::Validation(
                "dialogue entry must have at least one chunk".to_owned(),
            ));
        }
        if self.visible.iter().any(|slot| slot.entry.id == entry.id) {
            warn!(id = %entry.id, "rejecting duplicate dialogue entry");
            return Err(DomainError::Validation(format!(
                "dialogue entry {} is already visible",
                entry.id
            )));
        }

        if self.locked {
            if let Some(superseded) = self.pending.replace(entry) {
                debug!(id = %superseded.id, "pending dialogue entry superseded");
            }
            return Ok(Enqueued::Buffered);
        }

        self.start_transition(entry, now);
        Ok(Enqueued::Started)
    }

    /// Player-driven advancement.
    ///
    /// No-op while a transition is in flight or the queue is empty.
    /// Otherwise the most recently added visible entry either reveals
    /// its next chunk (no signal) or, with no chunks left, emits
    /// `EntryFinished` — once per call. The entry itself stays visible;
    /// the caller decides what happens next.
    pub fn advance(&mut self) -> Advanced {
        if self.locked || self.visible.is_empty() {
            return Advanced::Ignored;
        }

        let Some(newest) = self.visible.last_mut() else {
            return Advanced::Ignored;
        };
        if newest.entry.has_more_chunks() {
            newest.entry.current_chunk += 1;
            return Advanced::ChunkRevealed;
        }

        self.signals.push(DialogueSignal::EntryFinished {
            id: newest.entry.id.clone(),
        });
        Advanced::Finished
    }

    /// Ends the narrative session: empties the queue, releases the lock,
    /// and discards any pending entry, regardless of in-flight state.
    /// Outstanding timed completions become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.visible.clear();
        self.pending = None;
        self.locked = false;
        self.maybe_drained();
    }

    /// Completes due timed transitions.
    ///
    /// Hosts call this from their frame/update loop. Records scheduled
    /// under an older generation are dropped without touching state.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        // A held lock with no live scheduled work means a transition
        // died mid-flight; reset so the queue stays usable.
        if self.locked && !self.has_live_scheduled() {
            self.recover();
            return;
        }

        let mut due: Vec<ScheduledFinish> = Vec::new();
        self.scheduled.retain(|record| {
            if record.fire_at <= now {
                due.push(record.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|record| record.fire_at);

        for record in due {
            if record.generation != self.generation {
                debug!(id = %record.entry_id, "dropping stale transition record");
                continue;
            }
            self.apply_finish(&record);
        }

        if self.locked && !self.has_live_scheduled() {
            self.finish_transition(now);
        }
    }

    fn has_live_scheduled(&self) -> bool {
        self.scheduled
            .iter()
            .any(|record| record.generation == self.generation)
    }

    fn schedule(&mut self, fire_at: DateTime<Utc>, entry_id: ContentId, finish: SlotFinish) {
        self.scheduled.push(ScheduledFinish {
            fire_at,
            generation: self.generation,
            entry_id,
            finish,
        });
    }

    fn start_transition(&mut self, entry: DialogueEntry, now: DateTime<Utc>) {
        self.generation += 1;
        self.locked = true;
        self.shown_since_drain = true;

        // Older slots animate first; each later slot starts one stagger
        // further out.
        let mut offset = Duration::zero();
        if self.visible.len() >= MAX_VISIBLE {
            let oldest = &mut self.visible[0];
            oldest.state = AnimationState::Exiting;
            let id = oldest.entry.id.clone();
            self.schedule(now + offset + phase(), id, SlotFinish::Exit);
            offset += stagger();
        }
        if let Some(survivor) = self.visible.last_mut() {
            survivor.state = AnimationState::Shifting;
            let id = survivor.entry.id.clone();
            self.schedule(now + offset + phase(), id, SlotFinish::Shift);
            offset += stagger();
        }

        let id = entry.id.clone();
        self.visible.push(Slot {
            entry,
            state: AnimationState::Entering,
        });
        self.schedule(now + offset + phase(), id, SlotFinish::Enter);
    }

    fn apply_finish(&mut self, record: &ScheduledFinish) {
        let Some(position) = self
            .visible
            .iter()
            .position(|slot| slot.entry.id == record.entry_id)
        else {
            warn!(id = %record.entry_id, "transition record for unknown slot; resetting queue lock");
            self.recover();
            return;
        };

        match record.finish {
            SlotFinish::Enter | SlotFinish::Shift => {
                self.visible[position].state = AnimationState::Active;
            }
            SlotFinish::Exit => {
                self.visible.remove(position);
            }
        }
    }

    fn finish_transition(&mut self, now: DateTime<Utc>) {
        self.locked = false;
        if let Some(pending) = self.pending.take() {
            self.start_transition(pending, now);
        } else {
            self.maybe_drained();
        }
    }

    /// Forcibly resets the lock and drops the pending buffer so no entry
    /// is ever permanently stuck behind a failed transition.
    fn recover(&mut self) {
        warn!("dialogue transition failed mid-flight; resetting lock and pending buffer");
        self.generation += 1;
        self.locked = false;
        self.pending = None;
        self.maybe_drained();
    }

    /// Emits `Drained` exactly once per transition from "had at least
    /// one entry" to "empty with nothing pending"; never for a queue
    /// that has only ever been empty.
    fn maybe_drained(&mut self) {
        if self.visible.is_empty()
            && self.pending.is_none()
            && !self.locked
            && self.shown_since_drain
        {
            self.signals.push(DialogueSignal::Drained);
            self.shown_since_drain = false;
        }
    }
}
