//! Shared test mocks and utilities for the Wordbound narrative core.

mod clock;
mod repository;
mod sink;

pub use clock::{FixedClock, SteppingClock};
pub use repository::{
    EmptySnapshotRepository, FailingSnapshotRepository, RecordingSnapshotRepository,
};
pub use sink::RecordingSink;
