//! Dashboard HTTP surface.
//!
//! Every POST applies one state transition and redirects back to `/`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::middleware::audit::log_access;
use crate::api::server::{serve_in_background, ApiServer};
use crate::dashboard::backend::{BackendError, DashboardBackend};
use crate::dashboard::render::render_page;
use crate::dashboard::state::DashboardSession;

#[derive(Clone)]
pub struct DashboardContext {
    backend: Arc<dyn DashboardBackend + Send + Sync>,
    session: Arc<Mutex<DashboardSession>>,
}

impl DashboardContext {
    pub fn new(backend: Arc<dyn DashboardBackend + Send + Sync>) -> Self {
        Self {
            backend,
            session: Arc::new(Mutex::new(DashboardSession::new())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub patient_id: String,
}

#[derive(Debug, Deserialize)]
pub struct InquiryForm {
    #[serde(default)]
    pub query: String,
}

/// Run a backend call off the async runtime.
async fn call<T, F>(ctx: &DashboardContext, f: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: FnOnce(&dyn DashboardBackend) -> Result<T, BackendError> + Send + 'static,
{
    let backend = Arc::clone(&ctx.backend);
    tokio::task::spawn_blocking(move || f(backend.as_ref()))
        .await
        .unwrap_or_else(|e| Err(BackendError::Transport(format!("Task join error: {e}"))))
}

async fn index(State(ctx): State<DashboardContext>) -> Html<String> {
    let mut session = ctx.session.lock().await;
    let notice = session.take_notice();
    Html(render_page(
        &session.state,
        notice.as_deref(),
        session.session_id(),
    ))
}

async fn analyze(State(ctx): State<DashboardContext>, Form(form): Form<AnalyzeForm>) -> Redirect {
    let patient_id = form.patient_id.trim().to_string();
    if patient_id.is_empty() {
        ctx.session.lock().await.set_notice("Please enter a patient ID");
        return Redirect::to("/");
    }

    let result = call(&ctx, move |b| b.analyze(&patient_id)).await;
    ctx.session.lock().await.apply_analysis(result);
    Redirect::to("/")
}

async fn inquiry(State(ctx): State<DashboardContext>, Form(form): Form<InquiryForm>) -> Redirect {
    // Blank is forwarded: the handler answers it with every record.
    let query = form.query.trim().to_string();
    let result = call(&ctx, move |b| b.inquiry(&query)).await;
    ctx.session.lock().await.apply_inquiry(result);
    Redirect::to("/")
}

async fn clear(State(ctx): State<DashboardContext>) -> Redirect {
    ctx.session.lock().await.clear();
    Redirect::to("/")
}

/// Build the dashboard router over a backend.
pub fn dashboard_router(backend: Arc<dyn DashboardBackend + Send + Sync>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/inquiry", post(inquiry))
        .route("/clear", post(clear))
        .with_state(DashboardContext::new(backend))
        .layer(axum::middleware::from_fn(log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

pub async fn start_dashboard_server(
    backend: Arc<dyn DashboardBackend + Send + Sync>,
    addr: SocketAddr,
) -> Result<ApiServer, std::io::Error> {
    serve_in_background("dashboard", dashboard_router(backend), addr).await
}
