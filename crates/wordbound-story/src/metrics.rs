//! Derived game metrics.
//!
//! The evaluator never reads game state directly; external collaborators
//! hand in a [`GameStateView`] and the evaluator derives a [`Metrics`]
//! value from it and the current progress snapshot.

use wordbound_core::ids::{BookId, CategoryId};
use wordbound_progress::bitmap;
use wordbound_session::progress::SessionProgress;

/// A discovered book and its current part count, as reported by the
/// library collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBook {
    /// Book identifier.
    pub id: BookId,
    /// Number of parts the book currently has.
    pub total_parts: u32,
}

/// Raw game state handed in by external collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStateView {
    /// Books the player has discovered.
    pub discovered_books: Vec<DiscoveredBook>,
    /// Total completed puzzle count.
    pub puzzles_completed: u32,
    /// Whether the hidden category has been revealed.
    pub hidden_revealed: bool,
    /// Category the player is currently browsing, if any.
    pub current_category: Option<CategoryId>,
}

/// Metrics derived for one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Number of discovered books.
    pub books_discovered: u32,
    /// Number of completed puzzles.
    pub puzzles_completed: u32,
    /// Number of discovered books whose every part is complete.
    pub books_completed: u32,
    /// Whether the hidden category has been revealed.
    pub hidden_revealed: bool,
    /// Category the player is currently browsing, if any.
    pub current_category: Option<CategoryId>,
}

impl Metrics {
    /// Metric names addressable from progression rule conditions.
    pub const KNOWN_NAMES: [&'static str; 4] = [
        "books_discovered",
        "puzzles_completed",
        "books_completed",
        "hidden_revealed",
    ];

    /// Numeric value of the named metric; booleans read as 0/1.
    ///
    /// Unknown names yield `None`, which makes the owning rule
    /// unmatchable.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<i64> {
        match name {
            "books_discovered" => Some(i64::from(self.books_discovered)),
            "puzzles_completed" => Some(i64::from(self.puzzles_completed)),
            "books_completed" => Some(i64::from(self.books_completed)),
            "hidden_revealed" => Some(i64::from(self.hidden_revealed)),
            _ => None,
        }
    }
}

/// Pure metric derivation from the progress snapshot and the
/// collaborator-provided state view. No side effects.
///
/// A discovered book counts as completed when its sanitized bitmap has
/// every part set; zero-part books never count.
#[must_use]
pub fn compute_metrics(progress: &SessionProgress, view: &GameStateView) -> Metrics {
    let books_completed = view
        .discovered_books
        .iter()
        .filter(|book| {
            book.total_parts > 0
                && bitmap::is_complete(progress.bitmap_for(&book.id), book.total_parts)
        })
        .count();

    Metrics {
        books_discovered: u32::try_from(view.discovered_books.len()).unwrap_or(u32::MAX),
        puzzles_completed: view.puzzles_completed,
        books_completed: u32::try_from(books_completed).unwrap_or(u32::MAX),
        hidden_revealed: view.hidden_revealed,
        current_category: view.current_category.clone(),
    }
}
