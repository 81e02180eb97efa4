//! Ports implemented by the storage, cache and transport layers

mod repositories;

pub use repositories::*;
