//! Local LLM integration: the Ollama client, prompts, and the two
//! model-backed collaborators (explanation and inquiry parsing).

pub mod explain;
pub mod inquiry;
pub mod ollama;
pub mod prompt;

pub use explain::{ExplanationGenerator, LlmExplainer};
pub use inquiry::{parse_inquiry_response, InquiryParser, LlmInquiryParser, ParsedInquiry};
pub use ollama::{LlmClient, OllamaClient};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}
