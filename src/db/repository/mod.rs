//! Repository layer: entity-scoped database operations.
//!
//! One table today; functions are re-exported here so callers import
//! from `crate::db` directly.

mod patient;

pub use patient::*;
