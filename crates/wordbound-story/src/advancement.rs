//! Story-beat advancement over the progression rule catalog.

use tracing::{debug, warn};
use wordbound_catalog::rules::{ProgressionRule, RuleCatalog};
use wordbound_core::clock::Clock;
use wordbound_session::progress::SessionProgress;

use crate::metrics::Metrics;

/// Selects the first matching advancement rule for the current beat.
///
/// Rules whose `from_beat` equals the current beat are evaluated in
/// ascending priority (declaration order breaks ties); a rule matches
/// iff every declared condition's metric value lies within its inclusive
/// bounds. Returns `None` when nothing matches — including always for an
/// empty (or degraded) catalog.
#[must_use]
pub fn check_beat_advancement<'a>(
    progress: &SessionProgress,
    metrics: &Metrics,
    catalog: &'a RuleCatalog,
) -> Option<&'a ProgressionRule> {
    catalog
        .applicable_from(progress.current_story_beat)
        .into_iter()
        .find(|rule| rule_matches(rule, metrics))
}

fn rule_matches(rule: &ProgressionRule, metrics: &Metrics) -> bool {
    rule.conditions.iter().all(|(name, bounds)| {
        metrics
            .value(name)
            .is_some_and(|value| bounds.contains(value))
    })
}

/// Applies a matched rule, producing a new snapshot at the target beat.
///
/// Advancement is monotonic: a rule whose target lies at or behind the
/// current beat is refused and the snapshot returned unchanged.
#[must_use]
pub fn apply_advancement(
    progress: &SessionProgress,
    rule: &ProgressionRule,
    clock: &dyn Clock,
) -> SessionProgress {
    if rule.to_beat <= progress.current_story_beat {
        warn!(
            from = %progress.current_story_beat,
            to = %rule.to_beat,
            "refusing non-forward beat advancement"
        );
        return progress.clone();
    }
    debug!(from = %progress.current_story_beat, to = %rule.to_beat, "advancing story beat");
    progress.with_story_beat(rule.to_beat, clock)
}

/// Metric names referenced by the catalog that the evaluator does not
/// know. Intended for a one-time warning at load; rules carrying such
/// names can never match.
#[must_use]
pub fn unknown_metric_names(catalog: &RuleCatalog) -> Vec<String> {
    let mut names: Vec<String> = catalog
        .rules
        .iter()
        .flat_map(|rule| rule.conditions.keys())
        .filter(|name| !Metrics::KNOWN_NAMES.contains(&name.as_str()))
        .cloned()
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use wordbound_catalog::rules::MetricBounds;
    use wordbound_core::beat::StoryBeat;
    use wordbound_test_support::FixedClock;

    use super::*;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn rule(
        from: StoryBeat,
        to: StoryBeat,
        priority: i32,
        conditions: &[(&str, Option<i64>, Option<i64>)],
    ) -> ProgressionRule {
        ProgressionRule {
            from_beat: from,
            to_beat: to,
            conditions: conditions
                .iter()
                .map(|&(name, min, max)| (name.to_owned(), MetricBounds { min, max }))
                .collect(),
            priority,
            description: String::new(),
        }
    }

    fn metrics(books_discovered: u32, puzzles_completed: u32) -> Metrics {
        Metrics {
            books_discovered,
            puzzles_completed,
            ..Metrics::default()
        }
    }

    #[test]
    fn test_matching_rule_is_returned() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock);
        let catalog = RuleCatalog {
            rules: vec![rule(
                StoryBeat::Hook,
                StoryBeat::FirstPlotPoint,
                0,
                &[("books_discovered", Some(3), None)],
            )],
        };

        assert!(check_beat_advancement(&progress, &metrics(2, 0), &catalog).is_none());
        let matched = check_beat_advancement(&progress, &metrics(3, 0), &catalog).unwrap();
        assert_eq!(matched.to_beat, StoryBeat::FirstPlotPoint);
    }

    #[test]
    fn test_rules_from_other_beats_are_ignored() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock);
        let catalog = RuleCatalog {
            rules: vec![rule(StoryBeat::Midpoint, StoryBeat::Climax, 0, &[])],
        };

        assert!(check_beat_advancement(&progress, &metrics(99, 99), &catalog).is_none());
    }

    #[test]
    fn test_lower_priority_wins() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock);
        let catalog = RuleCatalog {
            rules: vec![
                rule(StoryBeat::Hook, StoryBeat::Midpoint, 5, &[]),
                rule(StoryBeat::Hook, StoryBeat::FirstPlotPoint, 1, &[]),
            ],
        };

        let matched = check_beat_advancement(&progress, &metrics(0, 0), &catalog).unwrap();
        assert_eq!(matched.to_beat, StoryBeat::FirstPlotPoint);
    }

    #[test]
    fn test_every_condition_must_hold() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock);
        let catalog = RuleCatalog {
            rules: vec![rule(
                StoryBeat::Hook,
                StoryBeat::FirstPlotPoint,
                0,
                &[
                    ("books_discovered", Some(1), None),
                    ("puzzles_completed", Some(5), Some(10)),
                ],
            )],
        };

        assert!(check_beat_advancement(&progress, &metrics(1, 4), &catalog).is_none());
        assert!(check_beat_advancement(&progress, &metrics(1, 11), &catalog).is_none());
        assert!(check_beat_advancement(&progress, &metrics(1, 5), &catalog).is_some());
    }

    #[test]
    fn test_unknown_metric_makes_rule_unmatchable() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock);
        let catalog = RuleCatalog {
            rules: vec![rule(
                StoryBeat::Hook,
                StoryBeat::FirstPlotPoint,
                0,
                &[("no_such_metric", Some(0), None)],
            )],
        };

        assert!(check_beat_advancement(&progress, &metrics(99, 99), &catalog).is_none());
        assert_eq!(unknown_metric_names(&catalog), vec!["no_such_metric"]);
    }

    #[test]
    fn test_apply_advancement_moves_forward_only() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock)
            .with_story_beat(StoryBeat::Midpoint, &clock);

        let backward = rule(StoryBeat::Midpoint, StoryBeat::Hook, 0, &[]);
        let unchanged = apply_advancement(&progress, &backward, &clock);
        assert_eq!(unchanged.current_story_beat, StoryBeat::Midpoint);

        let forward = rule(StoryBeat::Midpoint, StoryBeat::Climax, 0, &[]);
        let advanced = apply_advancement(&progress, &forward, &clock);
        assert_eq!(advanced.current_story_beat, StoryBeat::Climax);
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let clock = fixed_clock();
        let progress = SessionProgress::new_game(&clock);

        assert!(check_beat_advancement(&progress, &metrics(99, 99), &RuleCatalog::default()).is_none());
    }
}
