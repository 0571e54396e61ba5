//! Wordbound Story — the narrative trigger evaluator.
//!
//! Synchronous, side-effect-free functions invoked at well-defined
//! state-transition points (after a puzzle completes, after a discovery).
//! They consume derived metrics — never raw game state — and produce new
//! immutable progress snapshots plus references into the blurb catalog.

pub mod advancement;
pub mod metrics;
pub mod triggers;
