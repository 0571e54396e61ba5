//! Narrative content ("blurb") catalog records.

use serde::{Deserialize, Serialize};
use wordbound_core::beat::StoryBeat;
use wordbound_core::ids::{ContentId, TriggerId};

/// The text body of a blurb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurbBody {
    /// Speaker shown on the dialogue panel.
    pub speaker: String,
    /// Paragraphs revealed one at a time as dialogue chunks.
    pub paragraphs: Vec<String>,
}

/// A unit of narrative content unlocked when its trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blurb {
    /// Unique content identifier.
    pub id: ContentId,
    /// Trigger that unlocks this blurb.
    pub trigger: TriggerId,
    /// Earliest beat at which the blurb is eligible.
    pub story_beat: StoryBeat,
    /// Tie-break within a trigger; lower shows first.
    #[serde(default)]
    pub order: i32,
    /// The text body.
    pub body: BlurbBody,
}

/// The ordered blurb catalog, immutable after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlurbCatalog {
    /// Blurbs in declaration order.
    pub blurbs: Vec<Blurb>,
}

impl BlurbCatalog {
    /// Whether the catalog holds no blurbs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blurbs.is_empty()
    }

    /// Looks a blurb up by id.
    #[must_use]
    pub fn by_id(&self, id: &ContentId) -> Option<&Blurb> {
        self.blurbs.iter().find(|blurb| &blurb.id == id)
    }

    /// The blurb shown when `trigger` fires at `beat`: eligible blurbs
    /// have `story_beat <= beat`, ties broken by ascending `order` (then
    /// declaration order).
    #[must_use]
    pub fn eligible_for(&self, trigger: &TriggerId, beat: StoryBeat) -> Option<&Blurb> {
        self.blurbs
            .iter()
            .filter(|blurb| &blurb.trigger == trigger && blurb.story_beat <= beat)
            .min_by_key(|blurb| blurb.order)
    }
}
