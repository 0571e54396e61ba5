//! Progression rule catalog records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wordbound_core::beat::StoryBeat;

/// Inclusive bounds on a single metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricBounds {
    /// Inclusive lower bound; omitted means unbounded below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Inclusive upper bound; omitted means unbounded above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl MetricBounds {
    /// Whether `value` lies within the declared bounds.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A declarative story-beat advancement rule.
///
/// Applies only while the current beat equals `from_beat`; matches when
/// every declared condition's metric value lies within its bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionRule {
    /// Beat this rule advances from.
    pub from_beat: StoryBeat,
    /// Beat the story advances to on a match.
    pub to_beat: StoryBeat,
    /// Metric name to bounds; every entry must hold for a match.
    #[serde(default)]
    pub conditions: BTreeMap<String, MetricBounds>,
    /// Lower values are evaluated first; declaration order breaks ties.
    #[serde(default)]
    pub priority: i32,
    /// Author-facing description of the rule's intent.
    #[serde(default)]
    pub description: String,
}

/// The ordered progression rule catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleCatalog {
    /// Rules in declaration order.
    pub rules: Vec<ProgressionRule>,
}

impl RuleCatalog {
    /// Whether the catalog holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules applicable from `beat`, in evaluation order: ascending
    /// priority, with declaration order breaking ties (stable sort).
    #[must_use]
    pub fn applicable_from(&self, beat: StoryBeat) -> Vec<&ProgressionRule> {
        let mut applicable: Vec<&ProgressionRule> = self
            .rules
            .iter()
            .filter(|rule| rule.from_beat == beat)
            .collect();
        applicable.sort_by_key(|rule| rule.priority);
        applicable
    }
}
