pub mod llm;
pub mod rag;
