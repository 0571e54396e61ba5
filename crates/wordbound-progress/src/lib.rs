//! Wordbound Progress — bit-packed part-completion bitmaps.
//!
//! One `u32` holds a whole book's completion state, so persisted per-book
//! progress stays a single machine word and completion checks are O(1).

pub mod bitmap;
