use serde::{Deserialize, Serialize};

use super::RagError;
use crate::models::PatientRecord;

/// Evidence grouped by category, as returned under `pdf_evidence`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSet {
    #[serde(default)]
    pub clinical_evidence: Vec<String>,
    #[serde(default)]
    pub insurance_evidence: Vec<String>,
}

impl EvidenceSet {
    /// Clinical passages followed by insurance passages.
    pub fn combined(&self) -> Vec<String> {
        self.clinical_evidence
            .iter()
            .chain(self.insurance_evidence.iter())
            .cloned()
            .collect()
    }

    pub fn total(&self) -> usize {
        self.clinical_evidence.len() + self.insurance_evidence.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceCategory {
    Clinical,
    Insurance,
}

impl EvidenceCategory {
    pub const ALL: [EvidenceCategory; 2] = [Self::Clinical, Self::Insurance];

    /// Corpus subdirectory holding this category's documents.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Clinical => "clinical",
            Self::Insurance => "insurance",
        }
    }
}

/// One retrievable passage of a reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidencePassage {
    pub category: EvidenceCategory,
    pub source: String,
    pub section_title: Option<String>,
    pub text: String,
}

/// Returns evidence for a record, optionally steered by free-text.
pub trait EvidenceRetriever {
    fn retrieve(
        &self,
        record: &PatientRecord,
        query: Option<&str>,
    ) -> Result<EvidenceSet, RagError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_keeps_clinical_first() {
        let set = EvidenceSet {
            clinical_evidence: vec!["c1".into(), "c2".into()],
            insurance_evidence: vec!["i1".into()],
        };
        assert_eq!(set.combined(), vec!["c1", "c2", "i1"]);
        assert_eq!(set.total(), 3);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(EvidenceSet::default()).unwrap();
        assert!(json["clinical_evidence"].as_array().unwrap().is_empty());
        assert!(json["insurance_evidence"].as_array().unwrap().is_empty());
    }
}
