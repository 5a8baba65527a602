//! Evidence retrieval: reference passages relevant to a patient record.

pub mod chunker;
pub mod corpus;
pub mod retrieval;
pub mod types;

pub use corpus::EvidenceCorpus;
pub use retrieval::KeywordRetriever;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Evidence corpus I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Evidence retrieval failed: {0}")]
    Retrieval(String),
}
