use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{EvidenceCategory, EvidenceCorpus, EvidenceRetriever, EvidenceSet, RagError};
use crate::models::{PatientRecord, FLAG_NO};

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid regex"));

const MIN_TERM_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "are", "was", "were", "has", "have", "had", "not", "but", "all",
    "any", "who", "whom", "which", "what", "that", "this", "these", "those", "from", "into",
    "patient", "patients", "show", "list", "find", "give", "how", "many", "much", "there",
    "their", "them", "they", "our", "out", "per", "level", "levels", "type", "mg", "mcg",
];

/// Lowercased alphanumeric words of at least three characters, minus stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.len() >= MIN_TERM_LEN && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Ranks corpus passages by how many distinct search terms they contain.
pub struct KeywordRetriever {
    corpus: EvidenceCorpus,
    top_k: usize,
    cholesterol_threshold: i64,
}

impl KeywordRetriever {
    pub fn new(corpus: EvidenceCorpus, top_k: usize, cholesterol_threshold: i64) -> Self {
        Self {
            corpus,
            top_k,
            cholesterol_threshold,
        }
    }

    /// Search terms for a record plus optional free text.
    pub fn query_terms(&self, record: &PatientRecord, query: Option<&str>) -> HashSet<String> {
        let mut text = String::new();
        for field in [&record.diagnosis, &record.medication, &record.insurance_plan] {
            text.push_str(field);
            text.push(' ');
        }
        for condition in record.comorbidities() {
            text.push_str(condition);
            text.push(' ');
        }
        if record
            .cholesterol
            .is_some_and(|c| c >= self.cholesterol_threshold)
        {
            text.push_str("cholesterol statin ");
        }
        if record.has_insurance.eq_ignore_ascii_case(FLAG_NO) {
            text.push_str("uninsured self-pay ");
        }
        if let Some(q) = query {
            text.push_str(q);
        }
        tokenize(&text).into_iter().collect()
    }

    fn top_passages(&self, category: EvidenceCategory, terms: &HashSet<String>) -> Vec<String> {
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize, &str)> = self
            .corpus
            .passages()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.category == category)
            .filter_map(|(order, p)| {
                let words: HashSet<String> = tokenize(&p.text).into_iter().collect();
                let score = terms.iter().filter(|t| words.contains(*t)).count();
                (score > 0).then_some((score, order, p.text.as_str()))
            })
            .collect();

        // Highest score first; earlier corpus position wins ties.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored
            .into_iter()
            .take(self.top_k)
            .map(|(_, _, text)| text.to_string())
            .collect()
    }
}

impl EvidenceRetriever for KeywordRetriever {
    fn retrieve(
        &self,
        record: &PatientRecord,
        query: Option<&str>,
    ) -> Result<EvidenceSet, RagError> {
        let terms = self.query_terms(record, query);
        let set = EvidenceSet {
            clinical_evidence: self.top_passages(EvidenceCategory::Clinical, &terms),
            insurance_evidence: self.top_passages(EvidenceCategory::Insurance, &terms),
        };
        tracing::debug!(
            patient_id = %record.patient_id,
            terms = terms.len(),
            clinical = set.clinical_evidence.len(),
            insurance = set.insurance_evidence.len(),
            "Evidence retrieved"
        );
        Ok(set)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::fixtures::patient;
    use crate::pipeline::rag::EvidencePassage;

    fn passage(category: EvidenceCategory, text: &str) -> EvidencePassage {
        EvidencePassage {
            category,
            source: "test.txt".into(),
            section_title: None,
            text: text.into(),
        }
    }

    fn corpus() -> EvidenceCorpus {
        EvidenceCorpus::new(vec![
            passage(EvidenceCategory::Clinical, "Hypertension control targets below 130/80 with lisinopril or similar agents."),
            passage(EvidenceCategory::Clinical, "Diabetes care includes metformin as first-line therapy."),
            passage(EvidenceCategory::Clinical, "Hypertension screening should happen yearly."),
            passage(EvidenceCategory::Clinical, "Asthma inhalers require technique review."),
            passage(EvidenceCategory::Insurance, "Gold plan covers chronic disease management visits."),
            passage(EvidenceCategory::Insurance, "Basic plan requires prior authorization."),
        ])
    }

    #[test]
    fn tokenize_drops_short_words_and_stopwords() {
        assert_eq!(
            tokenize("Show the patients with BP of 140/90 and Diabetes"),
            vec!["140", "diabetes"]
        );
    }

    #[test]
    fn ranks_by_overlap_then_corpus_order() {
        let retriever = KeywordRetriever::new(corpus(), 3, 200);
        let set = retriever.retrieve(&patient("1", "Ana"), None).unwrap();

        // Hypertension + lisinopril beats hypertension alone.
        assert_eq!(set.clinical_evidence.len(), 2);
        assert!(set.clinical_evidence[0].contains("lisinopril"));
        assert!(set.clinical_evidence[1].contains("screening"));
        assert_eq!(set.insurance_evidence, vec!["Gold plan covers chronic disease management visits."]);
    }

    #[test]
    fn comorbidities_and_query_add_terms() {
        let retriever = KeywordRetriever::new(corpus(), 4, 200);
        let mut record = patient("1", "Ana");
        record.diabetes = "Yes".into();
        let set = retriever.retrieve(&record, Some("asthma follow-up")).unwrap();
        assert!(set.clinical_evidence.iter().any(|p| p.contains("metformin")));
        assert!(set.clinical_evidence.iter().any(|p| p.contains("inhalers")));
    }

    #[test]
    fn top_k_caps_each_category() {
        let retriever = KeywordRetriever::new(corpus(), 1, 200);
        let set = retriever.retrieve(&patient("1", "Ana"), None).unwrap();
        assert_eq!(set.clinical_evidence.len(), 1);
        assert_eq!(set.insurance_evidence.len(), 1);
    }

    #[test]
    fn elevated_cholesterol_adds_term() {
        let retriever = KeywordRetriever::new(corpus(), 3, 200);
        let mut record = patient("1", "Ana");
        assert!(!retriever.query_terms(&record, None).contains("cholesterol"));
        record.cholesterol = Some(240);
        assert!(retriever.query_terms(&record, None).contains("cholesterol"));
    }

    #[test]
    fn empty_corpus_returns_no_evidence() {
        let retriever = KeywordRetriever::new(EvidenceCorpus::default(), 3, 200);
        let set = retriever.retrieve(&patient("1", "Ana"), Some("diabetes")).unwrap();
        assert_eq!(set, EvidenceSet::default());
    }
}
