use serde::{Deserialize, Serialize};

/// One row of the `patients` table.
///
/// Field names are the column names and the JSON keys the API returns.
/// Comorbidity flags are kept as the source strings ("Yes"/"No", "Smoker"...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: String,
    pub patient_name: String,
    pub age: i64,
    pub gender: String,
    pub diagnosis: String,
    pub visit_date: String,
    pub medication: String,
    pub dosage: String,
    pub insurance_plan: String,
    pub has_insurance: String,
    pub risk_level: String,
    pub care_priority: String,
    pub blood_pressure: String,
    pub heart_rate: Option<i64>,
    pub cholesterol: Option<i64>,
    pub diabetes: String,
    pub asthma: String,
    pub chronic_kidney_disease: String,
    pub obesity: String,
    pub smoking_status: String,
    pub anemia: String,
}

pub const FLAG_YES: &str = "Yes";
pub const FLAG_NO: &str = "No";
pub const SMOKER: &str = "Smoker";

impl PatientRecord {
    /// Placeholder handed to evidence retrieval and explanation when an
    /// inquiry matches nothing. Every flag "No", cholesterol 0, empty diagnosis.
    pub fn synthetic_default() -> Self {
        Self {
            patient_id: String::new(),
            patient_name: String::new(),
            age: 0,
            gender: String::new(),
            diagnosis: String::new(),
            visit_date: String::new(),
            medication: String::new(),
            dosage: String::new(),
            insurance_plan: String::new(),
            has_insurance: String::new(),
            risk_level: String::new(),
            care_priority: String::new(),
            blood_pressure: String::new(),
            heart_rate: None,
            cholesterol: Some(0),
            diabetes: FLAG_NO.into(),
            asthma: FLAG_NO.into(),
            chronic_kidney_disease: FLAG_NO.into(),
            obesity: FLAG_NO.into(),
            smoking_status: FLAG_NO.into(),
            anemia: FLAG_NO.into(),
        }
    }

    pub fn has_diabetes(&self) -> bool {
        self.diabetes == FLAG_YES
    }

    pub fn is_smoker(&self) -> bool {
        self.smoking_status == SMOKER
    }

    pub fn is_obese(&self) -> bool {
        self.obesity == FLAG_YES
    }

    pub fn has_ckd(&self) -> bool {
        self.chronic_kidney_disease == FLAG_YES
    }

    pub fn has_asthma(&self) -> bool {
        self.asthma == FLAG_YES
    }

    pub fn has_anemia(&self) -> bool {
        self.anemia == FLAG_YES
    }

    /// Human-readable names of the comorbidities flagged on this record.
    pub fn comorbidities(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.has_diabetes() {
            out.push("diabetes");
        }
        if self.has_asthma() {
            out.push("asthma");
        }
        if self.has_ckd() {
            out.push("chronic kidney disease");
        }
        if self.is_obese() {
            out.push("obesity");
        }
        if self.is_smoker() {
            out.push("smoking");
        }
        if self.has_anemia() {
            out.push("anemia");
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A record with no risk flags set; tests override what they need.
    pub fn patient(id: &str, name: &str) -> PatientRecord {
        PatientRecord {
            patient_id: id.into(),
            patient_name: name.into(),
            age: 54,
            gender: "Female".into(),
            diagnosis: "Hypertension".into(),
            visit_date: "2024-02-10".into(),
            medication: "Lisinopril".into(),
            dosage: "10mg".into(),
            insurance_plan: "Gold".into(),
            has_insurance: FLAG_YES.into(),
            risk_level: "Medium".into(),
            care_priority: "Routine".into(),
            blood_pressure: "140/90".into(),
            heart_rate: Some(78),
            cholesterol: Some(180),
            diabetes: FLAG_NO.into(),
            asthma: FLAG_NO.into(),
            chronic_kidney_disease: FLAG_NO.into(),
            obesity: FLAG_NO.into(),
            smoking_status: "Non-Smoker".into(),
            anemia: FLAG_NO.into(),
        }
    }
}
