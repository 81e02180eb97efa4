//! Integration test utilities for the reaction bot
//!
//! Runs whole events through the dispatcher over in-process stores, with a
//! notifier that records effects instead of talking to the platform.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
