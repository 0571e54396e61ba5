//! Wordbound Engine — the per-session wiring object.
//!
//! Replaces the old singleton managers: a [`GameSession`] is constructed
//! once per session and passed by reference to consumers, so there is no
//! hidden global state and independent sessions coexist under test.

pub mod session;

pub use session::GameSession;
