//! The game session: evaluator, queue, and notification bus in one
//! explicit object.
//!
//! Control flow per game event: metrics are recomputed, at most one beat
//! advancement is applied, at most one trigger fires, and the unlocked
//! blurb is enqueued for presentation. Each step publishes its one-way
//! notification; no subscriber is required.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;
use wordbound_catalog::blurbs::{Blurb, BlurbCatalog};
use wordbound_catalog::rules::RuleCatalog;
use wordbound_core::clock::Clock;
use wordbound_core::error::DomainError;
use wordbound_core::ids::BookId;
use wordbound_core::notification::{Notification, NotificationBus, Subscriber};
use wordbound_core::repository::SnapshotRepository;
use wordbound_dialogue::entry::DialogueEntry;
use wordbound_dialogue::queue::{Advanced, DialogueQueue, DialogueSignal};
use wordbound_session::progress::SessionProgress;
use wordbound_session::repository::{load_progress, save_progress};
use wordbound_story::advancement::{apply_advancement, check_beat_advancement, unknown_metric_names};
use wordbound_story::metrics::{GameStateView, Metrics, compute_metrics};
use wordbound_story::triggers::{TriggerSpec, check_trigger, unlock};

/// One play session's narrative state and collaborators.
pub struct GameSession {
    id: Uuid,
    progress: SessionProgress,
    rules: Arc<RuleCatalog>,
    blurbs: Arc<BlurbCatalog>,
    triggers: Vec<TriggerSpec>,
    queue: DialogueQueue,
    bus: NotificationBus,
    previous_metrics: Metrics,
}

impl GameSession {
    /// Creates a session around an existing progress snapshot.
    ///
    /// Catalogs are loaded once at startup and shared; rules that
    /// reference unknown metrics are reported here, once, and can never
    /// match.
    #[must_use]
    pub fn new(
        id: Uuid,
        progress: SessionProgress,
        rules: Arc<RuleCatalog>,
        blurbs: Arc<BlurbCatalog>,
        triggers: Vec<TriggerSpec>,
    ) -> Self {
        for name in unknown_metric_names(&rules) {
            warn!(session = %id, metric = %name, "progression rule references unknown metric");
        }
        Self {
            id,
            progress,
            rules,
            blurbs,
            triggers,
            queue: DialogueQueue::new(),
            bus: NotificationBus::new(),
            previous_metrics: Metrics::default(),
        }
    }

    /// Creates a session with new-game defaults.
    #[must_use]
    pub fn new_game(
        id: Uuid,
        clock: &dyn Clock,
        rules: Arc<RuleCatalog>,
        blurbs: Arc<BlurbCatalog>,
        triggers: Vec<TriggerSpec>,
    ) -> Self {
        Self::new(id, SessionProgress::new_game(clock), rules, blurbs, triggers)
    }

    /// Resumes a session from the repository, sanitizing stored bitmaps
    /// against the library's current part counts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` if no snapshot exists, or
    /// `DomainError::Infrastructure` on a load/deserialization failure.
    pub async fn resume(
        id: Uuid,
        repo: &dyn SnapshotRepository,
        part_counts: &BTreeMap<BookId, u32>,
        rules: Arc<RuleCatalog>,
        blurbs: Arc<BlurbCatalog>,
        triggers: Vec<TriggerSpec>,
    ) -> Result<Self, DomainError> {
        let progress = load_progress(repo, id).await?.sanitized(part_counts);
        Ok(Self::new(id, progress, rules, blurbs, triggers))
    }

    /// Persists the current snapshot through the repository seam.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the write fails.
    pub async fn save(
        &self,
        repo: &dyn SnapshotRepository,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        save_progress(repo, self.id, &self.progress, clock).await
    }

    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current progress snapshot.
    #[must_use]
    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    /// The dialogue queue, for hosts rendering the visible slots.
    #[must_use]
    pub fn queue(&self) -> &DialogueQueue {
        &self.queue
    }

    /// Registers a notification subscriber.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.bus.subscribe(subscriber);
    }

    /// Marks part `index` of `book` complete — the codec-side mutation
    /// path, called by the puzzle collaborator before its game event.
    pub fn record_part_completed(&mut self, book: &BookId, index: u32, clock: &dyn Clock) {
        self.progress = self.progress.with_part_completed(book, index, clock);
    }

    /// Runs one evaluation pass after a game event (puzzle solved, book
    /// discovered, category opened).
    ///
    /// At most one beat advancement and one trigger fire per call; when
    /// a single update crosses several trigger thresholds, later ones
    /// wait for the next event.
    pub fn apply_game_event(&mut self, view: &GameStateView, clock: &dyn Clock) {
        let metrics = compute_metrics(&self.progress, view);

        if let Some(rule) = check_beat_advancement(&self.progress, &metrics, &self.rules) {
            let previous = self.progress.current_story_beat;
            let advanced = apply_advancement(&self.progress, rule, clock);
            if advanced.current_story_beat != previous {
                self.progress = advanced;
                self.bus.publish(&Notification::BeatChanged {
                    previous,
                    current: self.progress.current_story_beat,
                });
            }
        }

        let blurbs = Arc::clone(&self.blurbs);
        if let Some(fired) = check_trigger(
            &self.progress,
            &metrics,
            &self.previous_metrics,
            &self.triggers,
            &blurbs,
        ) {
            self.progress = unlock(&self.progress, &fired, clock);
            self.bus.publish(&Notification::ContentUnlocked {
                content_id: fired.blurb.id.clone(),
                trigger: fired.trigger.clone(),
            });
            self.present(fired.blurb, clock);
        }

        self.previous_metrics = metrics;
    }

    /// Enqueues a blurb for presentation.
    fn present(&mut self, blurb: &Blurb, clock: &dyn Clock) {
        let entry = DialogueEntry::new(
            blurb.id.clone(),
            blurb.body.speaker.clone(),
            blurb.body.paragraphs.clone(),
        );
        match self.queue.enqueue(entry, clock.now()) {
            Ok(outcome) => debug!(id = %blurb.id, ?outcome, "blurb enqueued"),
            // An unlock is never blocked by a presentation fault.
            Err(err) => warn!(id = %blurb.id, %err, "blurb could not be enqueued"),
        }
        self.relay_queue_signals();
    }

    /// Pumps timed queue transitions; hosts call this from their update
    /// loop.
    pub fn tick(&mut self, clock: &dyn Clock) {
        self.queue.tick(clock.now());
        self.relay_queue_signals();
    }

    /// Player-driven dialogue advancement. `Advanced::Finished` tells
    /// the host the newest entry is out of chunks; the host then either
    /// enqueues a follow-up or ends the dialogue.
    pub fn advance_dialogue(&mut self) -> Advanced {
        let outcome = self.queue.advance();
        self.relay_queue_signals();
        outcome
    }

    /// Ends the narrative session, emptying the queue.
    pub fn end_dialogue(&mut self) {
        self.queue.clear();
        self.relay_queue_signals();
    }

    fn relay_queue_signals(&mut self) {
        for signal in self.queue.take_signals() {
            match signal {
                DialogueSignal::Drained => self.bus.publish(&Notification::QueueDrained),
                // Entry completion is surfaced through the `Advanced`
                // return value; hosts react there.
                DialogueSignal::EntryFinished { id } => {
                    debug!(id = %id, "dialogue entry finished");
                }
            }
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("beat", &self.progress.current_story_beat)
            .field("unlocked", &self.progress.unlocked_content_ids.len())
            .finish_non_exhaustive()
    }
}
