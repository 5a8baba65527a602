use crate::models::PatientRecord;

/// Cholesterol at or above this value counts as elevated.
pub const CHOLESTEROL_THRESHOLD: i64 = 200;

pub const REASON_DIABETES: &str = "Patient has diabetes";
pub const REASON_SMOKER: &str = "Patient is an active smoker";
pub const REASON_CHOLESTEROL: &str = "Elevated cholesterol level";
pub const REASON_OBESITY: &str = "Patient is obese";
pub const REASON_CKD: &str = "Chronic kidney disease present";
pub const REASON_FALLBACK: &str = "Risk derived from combined clinical indicators";

/// Fixed-order reason rules behind a risk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskRules {
    pub cholesterol_threshold: i64,
}

impl Default for RiskRules {
    fn default() -> Self {
        Self {
            cholesterol_threshold: CHOLESTEROL_THRESHOLD,
        }
    }
}

impl RiskRules {
    pub fn new(cholesterol_threshold: i64) -> Self {
        Self {
            cholesterol_threshold,
        }
    }

    /// Reasons that fire for `record`, in rule order. Never empty.
    pub fn derive_reasons(&self, record: &PatientRecord) -> Vec<String> {
        let mut reasons = Vec::new();

        if record.has_diabetes() {
            reasons.push(REASON_DIABETES.to_string());
        }
        if record.is_smoker() {
            reasons.push(REASON_SMOKER.to_string());
        }
        if record
            .cholesterol
            .is_some_and(|c| c >= self.cholesterol_threshold)
        {
            reasons.push(REASON_CHOLESTEROL.to_string());
        }
        if record.is_obese() {
            reasons.push(REASON_OBESITY.to_string());
        }
        if record.has_ckd() {
            reasons.push(REASON_CKD.to_string());
        }

        if reasons.is_empty() {
            reasons.push(REASON_FALLBACK.to_string());
        }
        reasons
    }
}

/// "<risk_level> Risk", or "Unknown Risk" when the level is blank.
pub fn decision_label(record: &PatientRecord) -> String {
    let level = record.risk_level.trim();
    if level.is_empty() {
        "Unknown Risk".to_string()
    } else {
        format!("{level} Risk")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::fixtures::patient;

    #[test]
    fn diabetes_only() {
        let mut record = patient("1", "Ana");
        record.diabetes = "Yes".into();
        assert_eq!(RiskRules::default().derive_reasons(&record), vec![REASON_DIABETES]);
    }

    #[test]
    fn nothing_fires_gives_fallback() {
        let record = patient("1", "Ana");
        assert_eq!(RiskRules::default().derive_reasons(&record), vec![REASON_FALLBACK]);
    }

    #[test]
    fn all_rules_fire_in_order() {
        let mut record = patient("1", "Ana");
        record.diabetes = "Yes".into();
        record.smoking_status = "Smoker".into();
        record.cholesterol = Some(200);
        record.obesity = "Yes".into();
        record.chronic_kidney_disease = "Yes".into();
        assert_eq!(
            RiskRules::default().derive_reasons(&record),
            vec![REASON_DIABETES, REASON_SMOKER, REASON_CHOLESTEROL, REASON_OBESITY, REASON_CKD]
        );
    }

    #[test]
    fn cholesterol_threshold_is_inclusive_and_configurable() {
        let mut record = patient("1", "Ana");
        record.cholesterol = Some(199);
        assert_eq!(RiskRules::default().derive_reasons(&record), vec![REASON_FALLBACK]);
        record.cholesterol = Some(200);
        assert_eq!(RiskRules::default().derive_reasons(&record), vec![REASON_CHOLESTEROL]);
        assert_eq!(RiskRules::new(240).derive_reasons(&record), vec![REASON_FALLBACK]);
    }

    #[test]
    fn null_cholesterol_never_fires() {
        let mut record = patient("1", "Ana");
        record.cholesterol = None;
        assert_eq!(RiskRules::new(0).derive_reasons(&record), vec![REASON_FALLBACK]);
    }

    #[test]
    fn flags_are_exact_strings() {
        let mut record = patient("1", "Ana");
        record.diabetes = "yes".into();
        record.smoking_status = "Former Smoker".into();
        assert_eq!(RiskRules::default().derive_reasons(&record), vec![REASON_FALLBACK]);
    }

    #[test]
    fn decision_label_uses_risk_level() {
        let mut record = patient("1", "Ana");
        record.risk_level = "High".into();
        assert_eq!(decision_label(&record), "High Risk");
        record.risk_level = " ".into();
        assert_eq!(decision_label(&record), "Unknown Risk");
    }
}
