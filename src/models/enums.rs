use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Column names of the `patients` table. The only identifiers ever
// spliced into SQL text.
str_enum!(PatientField {
    PatientId => "patient_id",
    PatientName => "patient_name",
    Age => "age",
    Gender => "gender",
    Diagnosis => "diagnosis",
    VisitDate => "visit_date",
    Medication => "medication",
    Dosage => "dosage",
    InsurancePlan => "insurance_plan",
    HasInsurance => "has_insurance",
    RiskLevel => "risk_level",
    CarePriority => "care_priority",
    BloodPressure => "blood_pressure",
    HeartRate => "heart_rate",
    Cholesterol => "cholesterol",
    Diabetes => "diabetes",
    Asthma => "asthma",
    ChronicKidneyDisease => "chronic_kidney_disease",
    Obesity => "obesity",
    SmokingStatus => "smoking_status",
    Anemia => "anemia",
});

str_enum!(Operator {
    Eq => "eq",
    Ne => "ne",
    Like => "like",
    Gt => "gt",
    Gte => "gte",
    Lt => "lt",
    Lte => "lte",
});

impl PatientField {
    pub const ALL: [PatientField; 21] = [
        Self::PatientId,
        Self::PatientName,
        Self::Age,
        Self::Gender,
        Self::Diagnosis,
        Self::VisitDate,
        Self::Medication,
        Self::Dosage,
        Self::InsurancePlan,
        Self::HasInsurance,
        Self::RiskLevel,
        Self::CarePriority,
        Self::BloodPressure,
        Self::HeartRate,
        Self::Cholesterol,
        Self::Diabetes,
        Self::Asthma,
        Self::ChronicKidneyDisease,
        Self::Obesity,
        Self::SmokingStatus,
        Self::Anemia,
    ];

    /// INTEGER columns; everything else is stored as TEXT.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Age | Self::HeartRate | Self::Cholesterol)
    }

    /// Accepts column names in any case, with spaces or dashes for underscores,
    /// plus the short aliases models tend to produce ("name", "ckd", ...).
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        if let Ok(field) = normalized.parse() {
            return Some(field);
        }
        match normalized.as_str() {
            "name" => Some(Self::PatientName),
            "id" => Some(Self::PatientId),
            "ckd" | "kidney_disease" => Some(Self::ChronicKidneyDisease),
            "smoking" | "smoker" => Some(Self::SmokingStatus),
            "risk" => Some(Self::RiskLevel),
            "priority" => Some(Self::CarePriority),
            "insurance" => Some(Self::HasInsurance),
            "bp" => Some(Self::BloodPressure),
            _ => None,
        }
    }
}

impl Operator {
    /// SQL comparison operator for this variant.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Like => "LIKE",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    /// Accepts both the snake_case names and the usual symbols.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "eq" | "=" | "==" | "equals" | "is" => Some(Self::Eq),
            "ne" | "!=" | "<>" | "not_equals" => Some(Self::Ne),
            "like" | "contains" => Some(Self::Like),
            "gt" | ">" => Some(Self::Gt),
            "gte" | ">=" => Some(Self::Gte),
            "lt" | "<" => Some(Self::Lt),
            "lte" | "<=" => Some(Self::Lte),
            _ => None,
        }
    }
}
