//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// A patient id sent as either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatientIdInput {
    Integer(i64),
    Text(String),
}

impl PatientIdInput {
    /// The id as stored in the `patient_id` column.
    pub fn as_key(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub patient_id: PatientIdInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryRequest {
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_id_accepts_number_or_string() {
        let n: AnalyzeRequest = serde_json::from_str(r#"{"patient_id": 1001}"#).unwrap();
        assert_eq!(n.patient_id.as_key(), "1001");
        let s: AnalyzeRequest = serde_json::from_str(r#"{"patient_id": " P-7 "}"#).unwrap();
        assert_eq!(s.patient_id.as_key(), "P-7");
    }

    #[test]
    fn patient_id_rejects_other_shapes() {
        assert!(serde_json::from_str::<AnalyzeRequest>(r#"{"patient_id": [1]}"#).is_err());
        assert!(serde_json::from_str::<AnalyzeRequest>(r#"{}"#).is_err());
    }
}
