use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use super::enums::{Operator, PatientField};

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl FilterValue {
    fn to_sql(&self) -> Value {
        match self {
            FilterValue::Integer(i) => Value::Integer(*i),
            FilterValue::Text(s) => Value::Text(s.clone()),
        }
    }
}

/// A single `{field, operator, value}` test against the patients table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: PatientField,
    pub op: Operator,
    pub value: FilterValue,
}

impl Condition {
    /// Build a condition, coercing numeric-looking text for INTEGER columns.
    pub fn new(field: PatientField, op: Operator, value: FilterValue) -> Self {
        let value = match value {
            FilterValue::Text(s) if field.is_numeric() && op != Operator::Like => {
                match s.trim().parse::<i64>() {
                    Ok(i) => FilterValue::Integer(i),
                    Err(_) => FilterValue::Text(s),
                }
            }
            other => other,
        };
        Self { field, op, value }
    }

    /// Literal, case-insensitive substring match on `patient_name`.
    pub fn name_contains(fragment: &str) -> Self {
        Self {
            field: PatientField::PatientName,
            op: Operator::Like,
            value: FilterValue::Text(fragment.to_string()),
        }
    }

    fn compile(&self, placeholder: usize) -> (String, Value) {
        let column = self.field.as_str();
        match self.op {
            Operator::Like => {
                let raw = match &self.value {
                    FilterValue::Text(s) => s.clone(),
                    FilterValue::Integer(i) => i.to_string(),
                };
                let pattern = format!("%{}%", escape_like(&raw));
                (
                    format!("{column} LIKE ?{placeholder} ESCAPE '\\'"),
                    Value::Text(pattern),
                )
            }
            Operator::Eq | Operator::Ne
                if !self.field.is_numeric() && matches!(self.value, FilterValue::Text(_)) =>
            {
                (
                    format!("{column} {} ?{placeholder} COLLATE NOCASE", self.op.sql()),
                    self.value.to_sql(),
                )
            }
            _ => (
                format!("{column} {} ?{placeholder}", self.op.sql()),
                self.value.to_sql(),
            ),
        }
    }
}

/// Escape LIKE wildcards so the fragment matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Conjunction of conditions. Empty means "every row".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Compile to a `WHERE` body and its bound parameters.
    ///
    /// Returns `None` for the empty predicate. Column names come from
    /// `PatientField`; every value is a `?N` parameter.
    pub fn to_sql(&self) -> Option<(String, Vec<Value>)> {
        if self.conditions.is_empty() {
            return None;
        }
        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::with_capacity(self.conditions.len());
        for (i, condition) in self.conditions.iter().enumerate() {
            let (clause, value) = condition.compile(i + 1);
            clauses.push(clause);
            params.push(value);
        }
        Some((clauses.join(" AND "), params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_predicate_compiles_to_none() {
        assert!(Predicate::default().to_sql().is_none());
    }

    #[test]
    fn conditions_are_and_joined_with_numbered_params() {
        let predicate = Predicate::new(vec![
            Condition::new(
                PatientField::RiskLevel,
                Operator::Eq,
                FilterValue::Text("High".into()),
            ),
            Condition::new(
                PatientField::Cholesterol,
                Operator::Gte,
                FilterValue::Integer(200),
            ),
        ]);
        let (sql, params) = predicate.to_sql().unwrap();
        assert_eq!(
            sql,
            "risk_level = ?1 COLLATE NOCASE AND cholesterol >= ?2"
        );
        assert_eq!(params, vec![Value::Text("High".into()), Value::Integer(200)]);
    }

    #[test]
    fn name_fragment_is_escaped_literal_substring() {
        let predicate = Predicate::default().and(Condition::name_contains("50%_o'neil"));
        let (sql, params) = predicate.to_sql().unwrap();
        assert_eq!(sql, "patient_name LIKE ?1 ESCAPE '\\'");
        assert_eq!(params, vec![Value::Text("%50\\%\\_o'neil%".into())]);
    }

    #[test]
    fn numeric_text_is_coerced_for_integer_columns() {
        let condition = Condition::new(
            PatientField::Age,
            Operator::Gt,
            FilterValue::Text(" 60 ".into()),
        );
        assert_eq!(condition.value, FilterValue::Integer(60));

        let text = Condition::new(
            PatientField::Diagnosis,
            Operator::Eq,
            FilterValue::Text("60".into()),
        );
        assert_eq!(text.value, FilterValue::Text("60".into()));
    }

    #[test]
    fn condition_deserializes_from_json() {
        let condition: Condition =
            serde_json::from_str(r#"{"field":"diabetes","op":"eq","value":"Yes"}"#).unwrap();
        assert_eq!(condition.field, PatientField::Diabetes);
        assert_eq!(condition.value, FilterValue::Text("Yes".into()));
    }
}
