//! Wordbound Dialogue — the animated dialogue queue.
//!
//! A cooperative state machine that bounds on-screen narrative panels to
//! two visible entries and guarantees arrival ordering under
//! asynchronous player input. Renderer-agnostic: hosts read the visible
//! slots and drive timing through `tick`.

pub mod entry;
pub mod queue;
