//! Dialogue entries and their animation lifecycle.

use wordbound_core::ids::ContentId;

/// One speaker's turn, split into sequential chunks revealed by
/// player-driven advancement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueEntry {
    /// Caller-supplied unique identifier.
    pub id: ContentId,
    /// Speaker shown on the panel.
    pub speaker: String,
    /// Ordered text chunks; must be non-empty.
    pub chunks: Vec<String>,
    /// Index of the currently revealed chunk.
    pub current_chunk: usize,
}

impl DialogueEntry {
    /// Creates an entry with the cursor at the first chunk.
    #[must_use]
    pub fn new(id: ContentId, speaker: impl Into<String>, chunks: Vec<String>) -> Self {
        Self {
            id,
            speaker: speaker.into(),
            chunks,
            current_chunk: 0,
        }
    }

    /// Text of the currently revealed chunk, if any.
    #[must_use]
    pub fn current_chunk_text(&self) -> Option<&str> {
        self.chunks.get(self.current_chunk).map(String::as_str)
    }

    /// Whether unrevealed chunks remain after the current one.
    #[must_use]
    pub fn has_more_chunks(&self) -> bool {
        self.current_chunk + 1 < self.chunks.len()
    }
}

/// Per-slot animation state.
///
/// `Entering`, `Shifting` and `Exiting` are transient and time-bounded;
/// `Active` is the stable resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Sliding into view.
    Entering,
    /// At rest.
    Active,
    /// Moving to make room for a newer entry.
    Shifting,
    /// Sliding out of view; removed on completion.
    Exiting,
}
