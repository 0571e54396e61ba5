//! Wordbound Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on. It contains no infrastructure code.

pub mod beat;
pub mod clock;
pub mod error;
pub mod ids;
pub mod notification;
pub mod repository;
