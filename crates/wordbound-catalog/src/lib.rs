//! Wordbound Catalog — declarative narrative configuration.
//!
//! Two read-only documents are consumed at startup and cached for the
//! session: the progression rule catalog and the trigger/blurb catalog.
//! Loading failures degrade to empty catalogs so the game stays playable
//! with no further narrative advancement.

pub mod blurbs;
pub mod loader;
pub mod rules;
