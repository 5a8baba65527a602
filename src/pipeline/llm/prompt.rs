use crate::models::{Operator, PatientField, PatientRecord};

pub const EXPLAIN_SYSTEM_PROMPT: &str = "You are a clinical decision-support assistant for hospital staff. \
Explain risk assessments in plain clinical language. Base every statement on the \
patient data, the listed reasons and the supplied evidence. Do not invent findings, \
do not prescribe treatment, and keep the answer under 200 words.";

pub const INQUIRY_SYSTEM_PROMPT: &str = "You translate hospital staff questions about the patient \
table into structured filters. Answer with a single JSON object and nothing else.";

/// Prompt asking the model to explain a decision for one record.
pub fn build_explanation_prompt(
    record: &PatientRecord,
    reasons: &[String],
    evidence: &[String],
) -> String {
    let mut prompt = String::from("<PATIENT>\n");
    prompt.push_str(&record_summary(record));
    prompt.push_str("</PATIENT>\n\n<REASONS>\n");
    for reason in reasons {
        prompt.push_str("- ");
        prompt.push_str(reason);
        prompt.push('\n');
    }
    prompt.push_str("</REASONS>\n\n<EVIDENCE>\n");
    if evidence.is_empty() {
        prompt.push_str("No reference evidence was found.\n");
    }
    for (i, passage) in evidence.iter().enumerate() {
        prompt.push_str(&format!("[{}] {}\n", i + 1, passage));
    }
    prompt.push_str("</EVIDENCE>\n\n");
    prompt.push_str(
        "Explain why this assessment applies, citing evidence numbers where relevant, \
         and note any insurance considerations.",
    );
    prompt
}

/// Prompt asking the model to turn a question into filter conditions.
pub fn build_inquiry_prompt(query: &str) -> String {
    let fields: Vec<&str> = PatientField::ALL.iter().map(|f| f.as_str()).collect();
    let ops: Vec<&str> = [
        Operator::Eq,
        Operator::Ne,
        Operator::Like,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
    ]
    .iter()
    .map(|o| o.as_str())
    .collect();

    format!(
        "Columns: {fields}\n\
         Operators: {ops}\n\
         Flag columns (diabetes, asthma, chronic_kidney_disease, obesity, anemia, has_insurance) hold \"Yes\" or \"No\"; \
         smoking_status holds \"Smoker\" or \"Non-Smoker\"; age, heart_rate and cholesterol are integers.\n\n\
         Return JSON of the form:\n\
         {{\"conditions\": [{{\"field\": \"<column>\", \"op\": \"<operator>\", \"value\": <string or integer>}}], \
         \"specific_name\": <patient name fragment or null>, \
         \"summary\": \"<one sentence describing the request>\", \
         \"display_mode\": \"ANALYTICS_GRID\" or \"PATIENT_LIST\"}}\n\n\
         Question: {query}",
        fields = fields.join(", "),
        ops = ops.join(", "),
    )
}

fn record_summary(record: &PatientRecord) -> String {
    let optional = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "unknown".into());
    let mut out = String::new();
    if !record.patient_name.is_empty() {
        out.push_str(&format!("Name: {}\n", record.patient_name));
    }
    out.push_str(&format!("Age: {}\nGender: {}\n", record.age, record.gender));
    out.push_str(&format!("Diagnosis: {}\n", record.diagnosis));
    out.push_str(&format!("Medication: {} {}\n", record.medication, record.dosage));
    out.push_str(&format!(
        "Insurance: {} (insured: {})\n",
        record.insurance_plan, record.has_insurance
    ));
    out.push_str(&format!(
        "Risk level: {}\nCare priority: {}\n",
        record.risk_level, record.care_priority
    ));
    out.push_str(&format!(
        "Blood pressure: {}\nHeart rate: {}\nCholesterol: {}\n",
        record.blood_pressure,
        optional(record.heart_rate),
        optional(record.cholesterol)
    ));
    let comorbidities = record.comorbidities();
    if comorbidities.is_empty() {
        out.push_str("Comorbidities: none recorded\n");
    } else {
        out.push_str(&format!("Comorbidities: {}\n", comorbidities.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::fixtures::patient;

    #[test]
    fn explanation_prompt_includes_reasons_and_numbered_evidence() {
        let mut record = patient("1", "Ana");
        record.diabetes = "Yes".into();
        let prompt = build_explanation_prompt(
            &record,
            &["Patient has diabetes".into()],
            &["HbA1c quarterly".into(), "Gold covers endocrinology".into()],
        );
        assert!(prompt.contains("- Patient has diabetes"));
        assert!(prompt.contains("[1] HbA1c quarterly"));
        assert!(prompt.contains("[2] Gold covers endocrinology"));
        assert!(prompt.contains("Comorbidities: diabetes"));
    }

    #[test]
    fn explanation_prompt_handles_missing_evidence_and_vitals() {
        let prompt = build_explanation_prompt(&PatientRecord::synthetic_default(), &[], &[]);
        assert!(prompt.contains("No reference evidence was found."));
        assert!(prompt.contains("Heart rate: unknown"));
        assert!(!prompt.contains("Name:"));
    }

    #[test]
    fn inquiry_prompt_lists_columns_and_question() {
        let prompt = build_inquiry_prompt("smokers over 60");
        assert!(prompt.contains("chronic_kidney_disease"));
        assert!(prompt.contains("Question: smokers over 60"));
        assert!(prompt.contains("\"conditions\""));
    }
}
