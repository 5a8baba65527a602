//! HTTP API for the analysis and inquiry handlers.
//!
//! `api_router()` returns a composable `Router`; `server` binds it and
//! runs it with graceful shutdown.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
