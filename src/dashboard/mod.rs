//! Browser dashboard for clinicians.
//!
//! A small server-rendered front-end over the analysis handlers, reached
//! either through the HTTP API (`HttpBackend`) or in-process (`LocalBackend`).

pub mod backend;
pub mod render;
pub mod server;
pub mod state;

pub use backend::{BackendError, DashboardBackend, HttpBackend, LocalBackend};
pub use server::{dashboard_router, start_dashboard_server};
pub use state::{DashboardSession, DashboardState};
