use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeRequest, ApiContext};
use crate::core_state::run_blocking;
use crate::decision::{analyze_by_id, AnalysisReport};

/// `POST /analyze`: risk analysis for one patient.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let Json(request) = payload?;
    let patient_id = request.patient_id.as_key();
    tracing::debug!(%patient_id, "Analyze request");

    let report = run_blocking(ctx.core.clone(), move |core| analyze_by_id(core, &patient_id)).await?;
    Ok(Json(report))
}
