//! The ordered story-beat vocabulary.

use serde::{Deserialize, Serialize};

/// A narrative phase in the fixed story arc.
///
/// Beats are totally ordered by declaration; progression through them is
/// monotonic and never moves backward through normal rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryBeat {
    /// The opening hook.
    Hook,
    /// The story commits to its central conflict.
    FirstPlotPoint,
    /// Complications build.
    RisingAction,
    /// The midpoint reversal.
    Midpoint,
    /// The final commitment before the climax.
    SecondPlotPoint,
    /// The climax.
    Climax,
    /// The resolution.
    Resolution,
}

impl StoryBeat {
    /// All beats in narrative order.
    pub const ALL: [Self; 7] = [
        Self::Hook,
        Self::FirstPlotPoint,
        Self::RisingAction,
        Self::Midpoint,
        Self::SecondPlotPoint,
        Self::Climax,
        Self::Resolution,
    ];

    /// The beat a new game starts at.
    #[must_use]
    pub fn initial() -> Self {
        Self::Hook
    }

    /// Snake-case name matching the catalog serialization.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::FirstPlotPoint => "first_plot_point",
            Self::RisingAction => "rising_action",
            Self::Midpoint => "midpoint",
            Self::SecondPlotPoint => "second_plot_point",
            Self::Climax => "climax",
            Self::Resolution => "resolution",
        }
    }
}

impl std::fmt::Display for StoryBeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
