use std::sync::Arc;

use super::prompt::{build_explanation_prompt, EXPLAIN_SYSTEM_PROMPT};
use super::{LlmClient, LlmError};
use crate::models::PatientRecord;

/// Produces free-text explanation of a decision for a record.
pub trait ExplanationGenerator {
    fn explain(
        &self,
        record: &PatientRecord,
        reasons: &[String],
        evidence: &[String],
    ) -> Result<String, LlmError>;
}

/// Explanation backed by a local model.
pub struct LlmExplainer {
    client: Arc<dyn LlmClient + Send + Sync>,
    model: String,
}

impl LlmExplainer {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl ExplanationGenerator for LlmExplainer {
    fn explain(
        &self,
        record: &PatientRecord,
        reasons: &[String],
        evidence: &[String],
    ) -> Result<String, LlmError> {
        let prompt = build_explanation_prompt(record, reasons, evidence);
        let start = std::time::Instant::now();
        let text = self
            .client
            .generate(&self.model, &prompt, EXPLAIN_SYSTEM_PROMPT)?;
        tracing::debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Explanation generated"
        );
        Ok(text.trim().to_string())
    }
}
