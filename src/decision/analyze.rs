use serde::{Deserialize, Serialize};

use super::rules::decision_label;
use crate::core_state::{CoreError, CoreState};
use crate::models::PatientRecord;
use crate::pipeline::rag::EvidenceSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSupport {
    pub decision: String,
    pub why: Vec<String>,
    pub llm_explanation: String,
}

/// Response of the per-patient analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub patient_summary: PatientRecord,
    pub decision_support: DecisionSupport,
    pub pdf_evidence: EvidenceSet,
}

/// Look up one patient, derive reasons, gather evidence, and explain.
pub fn analyze_by_id(state: &CoreState, patient_id: &str) -> Result<AnalysisReport, CoreError> {
    let record = state
        .store
        .get_by_id(patient_id)?
        .ok_or_else(|| CoreError::PatientNotFound(patient_id.to_string()))?;

    let reasons = state.rules.derive_reasons(&record);
    tracing::debug!(patient_id, reasons = reasons.len(), "Reasons derived");

    let evidence = state.retriever.retrieve(&record, None)?;
    let explanation = state
        .explainer
        .explain(&record, &reasons, &evidence.combined())?;

    Ok(AnalysisReport {
        decision_support: DecisionSupport {
            decision: decision_label(&record),
            why: reasons,
            llm_explanation: explanation,
        },
        patient_summary: record,
        pdf_evidence: evidence,
    })
}
