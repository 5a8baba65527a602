use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, InquiryRequest};
use crate::core_state::run_blocking;
use crate::inquiry::{inquiry_by_sentence, InquiryReport};

/// `POST /hospital/inquiry`: filter the patient table from a free-text question.
pub async fn inquiry(
    State(ctx): State<ApiContext>,
    payload: Result<Json<InquiryRequest>, JsonRejection>,
) -> Result<Json<InquiryReport>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(query_len = request.query.len(), "Inquiry request");

    let report = run_blocking(ctx.core.clone(), move |core| {
        inquiry_by_sentence(core, &request.query)
    })
    .await?;
    Ok(Json(report))
}
