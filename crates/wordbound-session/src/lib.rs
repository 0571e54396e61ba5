//! Wordbound Session — the persisted progress aggregate.
//!
//! `SessionProgress` is the single snapshot shared by the evaluator and
//! the codec; external collaborators (save/load, UI badges) read it
//! through the repository seam.

pub mod progress;
pub mod repository;
