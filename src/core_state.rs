//! Shared application state for the request handlers.
//!
//! One `CoreState` is built at startup and wrapped in `Arc`; the API
//! router and the standalone dashboard both hold it. Everything inside is
//! read-only after construction.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, DEFAULT_MAX_MATCHED_RECORDS};
use crate::db::{DatabaseError, LoadReport, RecordStore};
use crate::decision::RiskRules;
use crate::pipeline::llm::{
    ExplanationGenerator, InquiryParser, LlmError, LlmExplainer, LlmInquiryParser, OllamaClient,
};
use crate::pipeline::rag::{EvidenceCorpus, EvidenceRetriever, KeywordRetriever, RagError};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Evidence retrieval error: {0}")]
    Evidence(#[from] RagError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Background task failed: {0}")]
    TaskJoin(String),
}

pub struct CoreState {
    pub store: RecordStore,
    pub retriever: Box<dyn EvidenceRetriever + Send + Sync>,
    pub explainer: Box<dyn ExplanationGenerator + Send + Sync>,
    pub parser: Box<dyn InquiryParser + Send + Sync>,
    pub rules: RiskRules,
    pub max_matched_records: usize,
}

impl CoreState {
    pub fn new(
        store: RecordStore,
        retriever: Box<dyn EvidenceRetriever + Send + Sync>,
        explainer: Box<dyn ExplanationGenerator + Send + Sync>,
        parser: Box<dyn InquiryParser + Send + Sync>,
    ) -> Self {
        Self {
            store,
            retriever,
            explainer,
            parser,
            rules: RiskRules::default(),
            max_matched_records: DEFAULT_MAX_MATCHED_RECORDS,
        }
    }

    pub fn with_rules(mut self, rules: RiskRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_max_matched_records(mut self, max: usize) -> Self {
        self.max_matched_records = max;
        self
    }

    /// Rebuild the store from the CSV and wire up the default collaborators.
    ///
    /// Blocking: recreates the database file and builds a blocking HTTP
    /// client, so run it before the runtime or inside `spawn_blocking`.
    pub fn from_config(config: &AppConfig) -> Result<(Self, LoadReport), CoreError> {
        let (store, report) = RecordStore::open_and_load(&config.db_path, &config.csv_path)?;

        let corpus = EvidenceCorpus::load_dir(&config.evidence_dir)?;
        let retriever = KeywordRetriever::new(
            corpus,
            config.evidence_top_k,
            config.cholesterol_threshold,
        );

        let client = Arc::new(OllamaClient::new(&config.ollama_url, config.llm_timeout_secs)?);
        let explainer = LlmExplainer::new(client.clone(), &config.ollama_model);
        let parser = LlmInquiryParser::new(client, &config.ollama_model);

        tracing::info!(
            ollama_url = %config.ollama_url,
            model = %config.ollama_model,
            "LLM collaborators configured"
        );

        let state = Self::new(store, Box::new(retriever), Box::new(explainer), Box::new(parser))
            .with_rules(RiskRules::new(config.cholesterol_threshold))
            .with_max_matched_records(config.max_matched_records);
        Ok((state, report))
    }
}

/// Run a blocking handler against shared state on the blocking pool.
pub async fn run_blocking<T, F>(state: Arc<CoreState>, f: F) -> Result<T, CoreError>
where
    T: Send + 'static,
    F: FnOnce(&CoreState) -> Result<T, CoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| CoreError::TaskJoin(e.to_string()))?
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_with_missing_files_starts_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::with_base_dir(tmp.path());
        let (state, report) = CoreState::from_config(&config).unwrap();
        assert!(report.source_missing);
        assert!(state.store.is_empty().unwrap());
        assert_eq!(state.max_matched_records, 10);
        assert_eq!(state.rules.cholesterol_threshold, 200);
    }

    #[tokio::test]
    async fn run_blocking_returns_handler_result() {
        let state = Arc::new(fixtures::state_with(&[], Default::default()));
        let len = run_blocking(state, |s| Ok(s.store.len()?)).await.unwrap();
        assert_eq!(len, 0);
    }
}
