//! The ordered narrative trigger ladder.
//!
//! Triggers are evaluated in declaration order and at most one fires per
//! evaluation call: when a single metrics update crosses several
//! thresholds, only the earliest-declared one fires and the rest wait
//! for the next call. Crossing-edge conditions compare the previous and
//! current metric values, so a trigger fires exactly once when the
//! threshold is crossed and never when the metric was already past it on
//! both sides.

use tracing::debug;
use wordbound_catalog::blurbs::{Blurb, BlurbCatalog};
use wordbound_core::clock::Clock;
use wordbound_core::ids::{CategoryId, TriggerId};
use wordbound_session::progress::SessionProgress;

use crate::metrics::Metrics;

/// Which counting metric a threshold trigger watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMetric {
    /// Number of discovered books.
    BooksDiscovered,
    /// Number of completed puzzles.
    PuzzlesCompleted,
    /// Number of fully completed books.
    BooksCompleted,
}

impl CountMetric {
    fn read(self, metrics: &Metrics) -> u32 {
        match self {
            Self::BooksDiscovered => metrics.books_discovered,
            Self::PuzzlesCompleted => metrics.puzzles_completed,
            Self::BooksCompleted => metrics.books_completed,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::BooksDiscovered => "books_discovered",
            Self::PuzzlesCompleted => "puzzles_completed",
            Self::BooksCompleted => "books_completed",
        }
    }
}

/// The condition half of a trigger declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCondition {
    /// Holds at the very start, while nothing has ever been unlocked.
    GameStart,
    /// Holds when `metric` crosses from below `threshold` to at/above it.
    CountReached {
        /// Watched metric.
        metric: CountMetric,
        /// Crossing threshold.
        threshold: u32,
    },
    /// Holds when the hidden category becomes revealed.
    HiddenRevealed,
    /// Holds when the current category changes to `category`.
    CategoryEntered {
        /// Category being entered.
        category: CategoryId,
    },
}

/// One entry in the declaration-ordered trigger table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSpec {
    /// Identifier recorded in `fired_triggers` and referenced by blurbs.
    pub id: TriggerId,
    /// Condition evaluated against the metrics delta.
    pub condition: TriggerCondition,
    /// Whether the trigger may fire more than once.
    pub repeatable: bool,
}

impl TriggerSpec {
    fn once(id: impl Into<String>, condition: TriggerCondition) -> Self {
        Self {
            id: TriggerId::new(id),
            condition,
            repeatable: false,
        }
    }
}

/// Milestone thresholds for book discovery and completion.
const BOOK_MILESTONES: [u32; 4] = [5, 10, 25, 50];
/// Milestone thresholds for puzzle completion.
const PUZZLE_MILESTONES: [u32; 4] = [10, 50, 100, 250];

/// Builds the built-in trigger table in declaration order: game start,
/// crossing-edge firsts, parametrized milestones, then the flag and
/// category-entry triggers for the given categories.
#[must_use]
pub fn standard_trigger_table(categories: &[CategoryId]) -> Vec<TriggerSpec> {
    let mut table = vec![
        TriggerSpec::once("game_start", TriggerCondition::GameStart),
        TriggerSpec::once(
            "first_book_discovered",
            TriggerCondition::CountReached {
                metric: CountMetric::BooksDiscovered,
                threshold: 1,
            },
        ),
        TriggerSpec::once(
            "first_puzzle_completed",
            TriggerCondition::CountReached {
                metric: CountMetric::PuzzlesCompleted,
                threshold: 1,
            },
        ),
        TriggerSpec::once(
            "first_book_completed",
            TriggerCondition::CountReached {
                metric: CountMetric::BooksCompleted,
                threshold: 1,
            },
        ),
    ];

    for metric in [CountMetric::BooksDiscovered, CountMetric::BooksCompleted] {
        for threshold in BOOK_MILESTONES {
            table.push(TriggerSpec::once(
                format!("{}_{threshold}", metric.name()),
                TriggerCondition::CountReached { metric, threshold },
            ));
        }
    }
    for threshold in PUZZLE_MILESTONES {
        table.push(TriggerSpec::once(
            format!("puzzles_completed_{threshold}"),
            TriggerCondition::CountReached {
                metric: CountMetric::PuzzlesCompleted,
                threshold,
            },
        ));
    }

    table.push(TriggerSpec::once(
        "hidden_category_revealed",
        TriggerCondition::HiddenRevealed,
    ));
    for category in categories {
        table.push(TriggerSpec::once(
            format!("category_entered_{category}"),
            TriggerCondition::CategoryEntered {
                category: category.clone(),
            },
        ));
    }

    table
}

/// A trigger match together with the blurb it unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTrigger<'a> {
    /// The matched trigger.
    pub trigger: TriggerId,
    /// The blurb chosen from the catalog.
    pub blurb: &'a Blurb,
}

/// Evaluates the trigger table against the metrics delta.
///
/// Returns the earliest-declared trigger that is unfired (or repeatable),
/// whose condition holds, and which has an eligible blurb at the current
/// beat. A matching trigger with no eligible blurb is skipped without
/// being marked fired.
#[must_use]
pub fn check_trigger<'a>(
    progress: &SessionProgress,
    metrics: &Metrics,
    previous: &Metrics,
    table: &[TriggerSpec],
    blurbs: &'a BlurbCatalog,
) -> Option<FiredTrigger<'a>> {
    for spec in table {
        if !spec.repeatable && progress.has_fired(&spec.id) {
            continue;
        }
        if !condition_holds(&spec.condition, progress, metrics, previous) {
            continue;
        }
        let Some(blurb) = blurbs.eligible_for(&spec.id, progress.current_story_beat) else {
            debug!(trigger = %spec.id, "matched trigger has no eligible blurb; skipping");
            continue;
        };
        return Some(FiredTrigger {
            trigger: spec.id.clone(),
            blurb,
        });
    }
    None
}

fn condition_holds(
    condition: &TriggerCondition,
    progress: &SessionProgress,
    metrics: &Metrics,
    previous: &Metrics,
) -> bool {
    match condition {
        TriggerCondition::GameStart => !progress.has_unlocked_content(),
        TriggerCondition::CountReached { metric, threshold } => {
            metric.read(previous) < *threshold && metric.read(metrics) >= *threshold
        }
        TriggerCondition::HiddenRevealed => !previous.hidden_revealed && metrics.hidden_revealed,
        TriggerCondition::CategoryEntered { category } => {
            metrics.current_category.as_ref() == Some(category)
                && previous.current_category.as_ref() != Some(category)
        }
    }
}

/// Applies a fired trigger: a new snapshot with the blurb unlocked, the
/// trigger recorded, the current-content pointer moved, and the
/// timestamp refreshed. Unlocking an already-unlocked blurb is
/// idempotent.
#[must_use]
pub fn unlock(
    progress: &SessionProgress,
    fired: &FiredTrigger<'_>,
    clock: &dyn Clock,
) -> SessionProgress {
    progress.with_unlock(fired.blurb.id.clone(), fired.trigger.clone(), clock)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use wordbound_catalog::blurbs::BlurbBody;
    use wordbound_core::beat::StoryBeat;
    use wordbound_core::ids::ContentId;
    use wordbound_test_support::FixedClock;

    use super::*;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn blurb_for(trigger: &str) -> Blurb {
        Blurb {
            id: ContentId::new(format!("blurb_{trigger}")),
            trigger: TriggerId::from(trigger),
            story_beat: StoryBeat::Hook,
            order: 0,
            body: BlurbBody {
                speaker: "Archivist".to_owned(),
                paragraphs: vec!["...".to_owned()],
            },
        }
    }

    fn catalog_for(triggers: &[&str]) -> BlurbCatalog {
        BlurbCatalog {
            blurbs: triggers.iter().map(|trigger| blurb_for(trigger)).collect(),
        }
    }

    fn counts(books_discovered: u32, puzzles_completed: u32, books_completed: u32) -> Metrics {
        Metrics {
            books_discovered,
            puzzles_completed,
            books_completed,
            ..Metrics::default()
        }
    }

    #[test]
    fn test_game_start_fires_only_before_any_unlock() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let blurbs = catalog_for(&["game_start"]);
        let progress = SessionProgress::new_game(&clock);
        let metrics = Metrics::default();

        let fired = check_trigger(&progress, &metrics, &metrics, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("game_start"));

        let unlocked = unlock(&progress, &fired, &clock);
        assert!(check_trigger(&unlocked, &metrics, &metrics, &table, &blurbs).is_none());
    }

    #[test]
    fn test_crossing_edge_fires_exactly_once() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let blurbs = catalog_for(&["first_book_discovered"]);
        let progress = SessionProgress::new_game(&clock);

        let before = counts(0, 0, 0);
        let after = counts(1, 0, 0);

        let fired = check_trigger(&progress, &after, &before, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("first_book_discovered"));
        let progress = unlock(&progress, &fired, &clock);

        // Repeated evaluation with the same final metrics: already fired.
        assert!(check_trigger(&progress, &after, &after, &table, &blurbs).is_none());
    }

    #[test]
    fn test_crossing_edge_requires_an_actual_crossing() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let blurbs = catalog_for(&["first_book_discovered"]);
        // Unlock something unrelated so game_start stays quiet.
        let progress = SessionProgress::new_game(&clock).with_unlock(
            ContentId::from("other"),
            TriggerId::from("other"),
            &clock,
        );

        // Already above threshold on both sides: no fire.
        let steady = counts(3, 0, 0);
        assert!(check_trigger(&progress, &steady, &steady, &table, &blurbs).is_none());
    }

    #[test]
    fn test_multiple_crossings_fire_earliest_declared_only() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let blurbs = catalog_for(&["first_book_discovered", "books_discovered_5"]);
        let progress = SessionProgress::new_game(&clock).with_unlock(
            ContentId::from("other"),
            TriggerId::from("other"),
            &clock,
        );

        // One update jumps 0 -> 6, crossing both thresholds.
        let before = counts(0, 0, 0);
        let after = counts(6, 0, 0);

        let fired = check_trigger(&progress, &after, &before, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("first_book_discovered"));
        let progress = unlock(&progress, &fired, &clock);

        // The later milestone needs another evaluation call to fire.
        let fired = check_trigger(&progress, &after, &before, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("books_discovered_5"));
    }

    #[test]
    fn test_trigger_without_eligible_blurb_is_skipped_unfired() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        // Catalog only has content for the milestone, not the first-find.
        let blurbs = catalog_for(&["books_discovered_5"]);
        let progress = SessionProgress::new_game(&clock).with_unlock(
            ContentId::from("other"),
            TriggerId::from("other"),
            &clock,
        );

        let before = counts(0, 0, 0);
        let after = counts(6, 0, 0);

        let fired = check_trigger(&progress, &after, &before, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("books_discovered_5"));

        // The skipped trigger was not marked fired.
        let progress = unlock(&progress, &fired, &clock);
        assert!(!progress.has_fired(&TriggerId::from("first_book_discovered")));
    }

    #[test]
    fn test_hidden_revealed_fires_on_rising_edge_only() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let blurbs = catalog_for(&["hidden_category_revealed"]);
        let progress = SessionProgress::new_game(&clock).with_unlock(
            ContentId::from("other"),
            TriggerId::from("other"),
            &clock,
        );

        let hidden = Metrics::default();
        let revealed = Metrics {
            hidden_revealed: true,
            ..Metrics::default()
        };

        assert!(check_trigger(&progress, &revealed, &revealed, &table, &blurbs).is_none());
        let fired = check_trigger(&progress, &revealed, &hidden, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("hidden_category_revealed"));
    }

    #[test]
    fn test_category_entry_fires_on_change_to_that_category() {
        let clock = fixed_clock();
        let myths = CategoryId::from("myths");
        let table = standard_trigger_table(std::slice::from_ref(&myths));
        let blurbs = catalog_for(&["category_entered_myths"]);
        let progress = SessionProgress::new_game(&clock).with_unlock(
            ContentId::from("other"),
            TriggerId::from("other"),
            &clock,
        );

        let outside = Metrics::default();
        let inside = Metrics {
            current_category: Some(myths),
            ..Metrics::default()
        };

        let fired = check_trigger(&progress, &inside, &outside, &table, &blurbs).unwrap();
        assert_eq!(fired.trigger, TriggerId::from("category_entered_myths"));

        // Staying in the category is not another entry.
        assert!(check_trigger(&progress, &inside, &inside, &table, &blurbs).is_none());
    }

    #[test]
    fn test_repeatable_trigger_fires_again_after_being_recorded() {
        let clock = fixed_clock();
        let myths = CategoryId::from("myths");
        let table = vec![TriggerSpec {
            id: TriggerId::from("category_entered_myths"),
            condition: TriggerCondition::CategoryEntered { category: myths.clone() },
            repeatable: true,
        }];
        let blurbs = catalog_for(&["category_entered_myths"]);
        let progress = SessionProgress::new_game(&clock);

        let outside = Metrics::default();
        let inside = Metrics {
            current_category: Some(myths),
            ..Metrics::default()
        };

        let fired = check_trigger(&progress, &inside, &outside, &table, &blurbs).unwrap();
        let progress = unlock(&progress, &fired, &clock);
        assert!(progress.has_fired(&TriggerId::from("category_entered_myths")));

        // A later re-entry fires again despite the recorded trigger.
        assert!(check_trigger(&progress, &inside, &outside, &table, &blurbs).is_some());
    }

    #[test]
    fn test_blurb_eligibility_respects_story_beat() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let late = Blurb {
            story_beat: StoryBeat::Midpoint,
            ..blurb_for("first_book_discovered")
        };
        let blurbs = BlurbCatalog { blurbs: vec![late] };
        let progress = SessionProgress::new_game(&clock).with_unlock(
            ContentId::from("other"),
            TriggerId::from("other"),
            &clock,
        );

        let before = counts(0, 0, 0);
        let after = counts(1, 0, 0);

        // At the hook the only blurb is not yet eligible.
        assert!(check_trigger(&progress, &after, &before, &table, &blurbs).is_none());

        let progress = progress.with_story_beat(StoryBeat::Midpoint, &clock);
        assert!(check_trigger(&progress, &after, &before, &table, &blurbs).is_some());
    }

    #[test]
    fn test_empty_catalog_never_fires() {
        let clock = fixed_clock();
        let table = standard_trigger_table(&[]);
        let progress = SessionProgress::new_game(&clock);
        let metrics = counts(10, 10, 10);

        assert!(
            check_trigger(
                &progress,
                &metrics,
                &Metrics::default(),
                &table,
                &BlurbCatalog::default()
            )
            .is_none()
        );
    }
}
