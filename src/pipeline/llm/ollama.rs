use serde::{Deserialize, Serialize};

use super::LlmError;

/// Text generation against a named model.
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Generation constrained to a JSON answer. Clients without a JSON
    /// mode fall back to plain generation.
    fn generate_json(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.generate(model, prompt, system)
    }
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Builds a blocking client; call from a blocking context.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    fn post_generate(&self, body: &OllamaGenerateRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url).json(body).send().map_err(|e| {
            if e.is_connect() {
                LlmError::OllamaConnection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError> {
        tracing::debug!(model, prompt_len = prompt.len(), "Ollama generate");
        self.post_generate(&OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            format: None,
        })
    }

    fn generate_json(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError> {
        tracing::debug!(model, prompt_len = prompt.len(), "Ollama generate (json)");
        self.post_generate(&OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            format: Some("json"),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 5).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn request_omits_format_unless_json() {
        let plain = OllamaGenerateRequest {
            model: "medgemma",
            prompt: "p",
            system: "s",
            stream: false,
            format: None,
        };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("format").is_none());
        assert_eq!(json["stream"], false);

        let constrained = OllamaGenerateRequest {
            format: Some("json"),
            ..plain
        };
        assert_eq!(serde_json::to_value(&constrained).unwrap()["format"], "json");
    }

    #[test]
    fn unreachable_server_is_connection_error() {
        // Port 9 (discard) is not an Ollama server on any test host.
        let client = OllamaClient::new("http://127.0.0.1:9", 2).unwrap();
        let err = client.generate("medgemma", "hi", "").unwrap_err();
        assert!(matches!(
            err,
            LlmError::OllamaConnection(_) | LlmError::HttpClient(_)
        ));
    }

    #[test]
    fn mock_default_json_falls_back_to_generate() {
        let mock = mocks::MockLlmClient::new("{}");
        assert_eq!(mock.generate_json("m", "p", "s").unwrap(), "{}");
        assert_eq!(mock.call_count(), 1);
    }
}
