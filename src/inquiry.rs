//! Natural-language hospital inquiry.

use serde::{Deserialize, Serialize};

use crate::core_state::{CoreError, CoreState};
use crate::models::{Condition, PatientRecord, Predicate};
use crate::pipeline::rag::EvidenceSet;

pub const DEFAULT_DISPLAY_MODE: &str = "ANALYTICS_GRID";

/// Reason handed to the explainer when the parser gives no summary.
pub const DEFAULT_INQUIRY_REASON: &str = "Hospital inquiry analysis";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryReport {
    pub query: String,
    pub total_count: usize,
    pub patient_names: Vec<String>,
    pub matched_records: Vec<PatientRecord>,
    pub pdf_evidence: EvidenceSet,
    pub deep_explanation: String,
    pub nlu_summary: Option<String>,
    pub display_mode: String,
}

/// Parse the question, filter the store, and explain the result.
///
/// Zero matches is not an error: evidence and explanation are produced
/// for the synthetic default record instead.
pub fn inquiry_by_sentence(state: &CoreState, query: &str) -> Result<InquiryReport, CoreError> {
    let parsed = state.parser.parse(query)?;

    let mut predicate = Predicate::new(parsed.conditions);
    if let Some(name) = parsed.specific_name.as_deref() {
        predicate = predicate.and(Condition::name_contains(name));
    }

    let matches = state.store.query(&predicate)?;
    let total_count = matches.len();
    let patient_names: Vec<String> = matches.iter().map(|r| r.patient_name.clone()).collect();
    tracing::debug!(conditions = predicate.conditions.len(), total_count, "Inquiry matched");

    let context = matches
        .first()
        .cloned()
        .unwrap_or_else(PatientRecord::synthetic_default);

    let evidence = state.retriever.retrieve(&context, Some(query))?;
    let reason = parsed
        .summary
        .clone()
        .unwrap_or_else(|| DEFAULT_INQUIRY_REASON.to_string());
    let explanation = state
        .explainer
        .explain(&context, &[reason], &evidence.combined())?;

    Ok(InquiryReport {
        query: query.to_string(),
        total_count,
        patient_names,
        matched_records: matches
            .into_iter()
            .take(state.max_matched_records)
            .collect(),
        pdf_evidence: evidence,
        deep_explanation: explanation,
        nlu_summary: parsed.summary,
        display_mode: parsed
            .display_mode
            .unwrap_or_else(|| DEFAULT_DISPLAY_MODE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_state::fixtures::{evidence, state_with};
    use crate::models::patient::fixtures::patient;
    use crate::models::{FilterValue, Operator, PatientField};
    use crate::pipeline::llm::explain::mocks::RecordingExplainer;
    use crate::pipeline::llm::inquiry::mocks::RecordingParser;
    use crate::pipeline::llm::ParsedInquiry;
    use crate::pipeline::rag::retrieval::mocks::RecordingRetriever;

    fn records(n: usize) -> Vec<PatientRecord> {
        (1..=n)
            .map(|i| {
                let mut r = patient(&i.to_string(), &format!("Patient {i}"));
                if i % 2 == 0 {
                    r.smoking_status = "Smoker".into();
                }
                r
            })
            .collect()
    }

    #[test]
    fn empty_parse_returns_every_record() {
        let state = state_with(&records(4), ParsedInquiry::default());
        let report = inquiry_by_sentence(&state, "").unwrap();
        assert_eq!(report.total_count, 4);
        assert_eq!(report.patient_names.len(), 4);
        assert_eq!(report.display_mode, DEFAULT_DISPLAY_MODE);
        assert_eq!(report.nlu_summary, None);
    }

    #[test]
    fn matched_records_capped_names_untruncated() {
        let state = state_with(&records(15), ParsedInquiry::default());
        let report = inquiry_by_sentence(&state, "everyone").unwrap();
        assert_eq!(report.total_count, 15);
        assert_eq!(report.patient_names.len(), 15);
        assert_eq!(report.matched_records.len(), 10);
        assert_eq!(report.matched_records[0].patient_id, "1");
        assert_eq!(report.patient_names[14], "Patient 15");
    }

    #[test]
    fn conditions_and_name_filter_apply() {
        let parsed = ParsedInquiry {
            conditions: vec![Condition::new(
                PatientField::SmokingStatus,
                Operator::Eq,
                FilterValue::Text("Smoker".into()),
            )],
            specific_name: Some("patient 1".into()),
            summary: Some("Smokers named Patient 1x".into()),
            display_mode: Some("PATIENT_LIST".into()),
        };
        let state = state_with(&records(12), parsed);
        let report = inquiry_by_sentence(&state, "smokers called patient 1").unwrap();
        // Smokers are the even ids; names containing "patient 1" are 1, 10, 11, 12.
        assert_eq!(report.patient_names, vec!["Patient 10", "Patient 12"]);
        assert_eq!(report.nlu_summary.as_deref(), Some("Smokers named Patient 1x"));
        assert_eq!(report.display_mode, "PATIENT_LIST");
    }

    #[test]
    fn zero_matches_use_synthetic_default() {
        let parsed = ParsedInquiry {
            specific_name: Some("Nobody".into()),
            ..Default::default()
        };
        let explainer = RecordingExplainer::new("Nothing matched");
        let explain_calls = explainer.calls.clone();
        let retriever = RecordingRetriever::new(evidence());
        let retrieve_calls = retriever.calls.clone();

        let mut state = state_with(&records(3), parsed);
        state.explainer = Box::new(explainer);
        state.retriever = Box::new(retriever);

        let report = inquiry_by_sentence(&state, "find Nobody").unwrap();
        assert_eq!(report.total_count, 0);
        assert!(report.patient_names.is_empty());
        assert!(report.matched_records.is_empty());
        assert_eq!(report.deep_explanation, "Nothing matched");

        let retrieved = retrieve_calls.lock().unwrap();
        assert_eq!(retrieved[0].0, PatientRecord::synthetic_default());
        assert_eq!(retrieved[0].1.as_deref(), Some("find Nobody"));

        let explained = explain_calls.lock().unwrap();
        assert_eq!(explained[0].record, PatientRecord::synthetic_default());
        assert_eq!(explained[0].reasons, vec![DEFAULT_INQUIRY_REASON]);
    }

    #[test]
    fn name_wildcards_match_literally() {
        let parsed = ParsedInquiry {
            specific_name: Some("%".into()),
            ..Default::default()
        };
        let state = state_with(&records(3), parsed);
        let report = inquiry_by_sentence(&state, "%").unwrap();
        assert_eq!(report.total_count, 0);
    }

    #[test]
    fn parser_sees_raw_query() {
        let parser = RecordingParser::new(ParsedInquiry::default());
        let calls = parser.calls.clone();
        let mut state = state_with(&records(1), ParsedInquiry::default());
        state.parser = Box::new(parser);
        inquiry_by_sentence(&state, "how many diabetics?").unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["how many diabetics?"]);
    }
}
