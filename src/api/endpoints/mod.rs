//! API endpoint handlers.
//!
//! Handlers are thin: blocking work runs on the blocking pool through
//! `core_state::run_blocking`.

pub mod analyze;
pub mod health;
pub mod inquiry;
