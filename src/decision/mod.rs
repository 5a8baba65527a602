//! Per-patient risk analysis.

pub mod analyze;
pub mod rules;

pub use analyze::{analyze_by_id, AnalysisReport, DecisionSupport};
pub use rules::{decision_label, RiskRules};
