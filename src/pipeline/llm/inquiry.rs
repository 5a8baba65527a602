use std::sync::Arc;

use serde::Serialize;

use super::prompt::{build_inquiry_prompt, INQUIRY_SYSTEM_PROMPT};
use super::{LlmClient, LlmError};
use crate::models::{Condition, FilterValue, Operator, PatientField};

/// Structured reading of a free-text hospital question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedInquiry {
    pub conditions: Vec<Condition>,
    pub specific_name: Option<String>,
    pub summary: Option<String>,
    pub display_mode: Option<String>,
}

/// Turns a question into filter conditions.
pub trait InquiryParser {
    fn parse(&self, query: &str) -> Result<ParsedInquiry, LlmError>;
}

/// Inquiry parsing backed by a local model in JSON mode.
pub struct LlmInquiryParser {
    client: Arc<dyn LlmClient + Send + Sync>,
    model: String,
}

impl LlmInquiryParser {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl InquiryParser for LlmInquiryParser {
    fn parse(&self, query: &str) -> Result<ParsedInquiry, LlmError> {
        if query.trim().is_empty() {
            tracing::debug!("Blank inquiry, skipping model");
            return Ok(ParsedInquiry::default());
        }
        let prompt = build_inquiry_prompt(query);
        let raw = self
            .client
            .generate_json(&self.model, &prompt, INQUIRY_SYSTEM_PROMPT)?;
        let parsed = parse_inquiry_response(&raw)?;
        tracing::debug!(
            conditions = parsed.conditions.len(),
            has_name = parsed.specific_name.is_some(),
            "Inquiry parsed"
        );
        Ok(parsed)
    }
}

/// Parse the model's answer into a `ParsedInquiry`.
///
/// Accepts a bare JSON object, a fenced block, or an object embedded in
/// prose. Conditions naming an unknown column or operator are dropped.
pub fn parse_inquiry_response(response: &str) -> Result<ParsedInquiry, LlmError> {
    let json_str = extract_json_object(response)?;
    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| LlmError::JsonParsing(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| LlmError::MalformedResponse("Expected a JSON object".into()))?;

    let conditions = obj
        .get("conditions")
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(parse_condition_lenient).collect())
        .unwrap_or_default();

    Ok(ParsedInquiry {
        conditions,
        specific_name: non_blank(obj.get("specific_name")),
        summary: non_blank(obj.get("summary")),
        display_mode: non_blank(obj.get("display_mode")),
    })
}

fn extract_json_object(response: &str) -> Result<&str, LlmError> {
    let body = match response.find("```") {
        Some(fence) => {
            let after = &response[fence + 3..];
            // Skip an info string such as "json".
            let content_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
            let content = &after[content_start..];
            let end = content
                .find("```")
                .ok_or_else(|| LlmError::MalformedResponse("Unclosed JSON block".into()))?;
            &content[..end]
        }
        None => response,
    };

    let start = body
        .find('{')
        .ok_or_else(|| LlmError::MalformedResponse("No JSON object found".into()))?;
    let end = body
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| LlmError::MalformedResponse("Unclosed JSON object".into()))?;
    Ok(&body[start..=end])
}

fn parse_condition_lenient(item: &serde_json::Value) -> Option<Condition> {
    let raw_field = item.get("field").and_then(|v| v.as_str()).unwrap_or_default();
    let Some(field) = PatientField::parse_lenient(raw_field) else {
        tracing::warn!(field = raw_field, "Dropping inquiry condition on unknown column");
        return None;
    };

    let raw_op = item
        .get("op")
        .or_else(|| item.get("operator"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let Some(op) = Operator::parse_lenient(raw_op) else {
        tracing::warn!(op = raw_op, "Dropping inquiry condition with unknown operator");
        return None;
    };

    let value = match item.get("value") {
        Some(serde_json::Value::String(s)) => FilterValue::Text(s.clone()),
        Some(serde_json::Value::Number(n)) => match n.as_i64() {
            Some(i) => FilterValue::Integer(i),
            None => FilterValue::Text(n.to_string()),
        },
        Some(serde_json::Value::Bool(b)) => FilterValue::Text(if *b { "Yes" } else { "No" }.into()),
        _ => {
            tracing::warn!(field = field.as_str(), "Dropping inquiry condition without a scalar value");
            return None;
        }
    };

    Some(Condition::new(field, op, value))
}

fn non_blank(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(str::to_string)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::ollama::mocks::MockLlmClient;

    #[test]
    fn parses_bare_object() {
        let raw = r#"{"conditions":[{"field":"smoking_status","op":"eq","value":"Smoker"},{"field":"age","op":">","value":60}],"specific_name":null,"summary":"Smokers over 60","display_mode":"ANALYTICS_GRID"}"#;
        let parsed = parse_inquiry_response(raw).unwrap();
        assert_eq!(parsed.conditions.len(), 2);
        assert_eq!(parsed.conditions[1].field, PatientField::Age);
        assert_eq!(parsed.conditions[1].op, Operator::Gt);
        assert_eq!(parsed.conditions[1].value, FilterValue::Integer(60));
        assert_eq!(parsed.specific_name, None);
        assert_eq!(parsed.summary.as_deref(), Some("Smokers over 60"));
    }

    #[test]
    fn parses_fenced_block_with_prose() {
        let raw = "Here you go:\n```json\n{\"conditions\": [], \"specific_name\": \"Diaz\"}\n```\nDone.";
        let parsed = parse_inquiry_response(raw).unwrap();
        assert!(parsed.conditions.is_empty());
        assert_eq!(parsed.specific_name.as_deref(), Some("Diaz"));
        assert_eq!(parsed.display_mode, None);
    }

    #[test]
    fn drops_unknown_fields_and_operators() {
        let raw = r#"{"conditions":[
            {"field":"password","op":"eq","value":"x"},
            {"field":"diabetes","op":"OR 1=1","value":"Yes"},
            {"field":"Diabetes","operator":"=","value":true},
            {"field":"cholesterol","op":">=","value":"200"}
        ]}"#;
        let parsed = parse_inquiry_response(raw).unwrap();
        assert_eq!(parsed.conditions.len(), 2);
        assert_eq!(parsed.conditions[0].field, PatientField::Diabetes);
        assert_eq!(parsed.conditions[0].value, FilterValue::Text("Yes".into()));
        assert_eq!(parsed.conditions[1].value, FilterValue::Integer(200));
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_inquiry_response("I cannot help with that").unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
        let err = parse_inquiry_response("{not json}").unwrap_err();
        assert!(matches!(err, LlmError::JsonParsing(_)));
    }

    #[test]
    fn blank_query_skips_model() {
        let client = Arc::new(MockLlmClient::new("{}"));
        let parser = LlmInquiryParser::new(client.clone(), "medgemma");
        assert_eq!(parser.parse("   ").unwrap(), ParsedInquiry::default());
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn query_goes_through_model() {
        let client = Arc::new(MockLlmClient::new(
            r#"{"conditions":[{"field":"risk_level","op":"eq","value":"High"}],"summary":"High risk"}"#,
        ));
        let parser = LlmInquiryParser::new(client.clone(), "medgemma");
        let parsed = parser.parse("high risk patients").unwrap();
        assert_eq!(parsed.conditions.len(), 1);
        assert!(client.prompts.lock().unwrap()[0].contains("Question: high risk patients"));
    }
}
