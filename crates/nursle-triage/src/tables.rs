//! Keyword, condition and recovery tables.
//!
//! Plain data: the built-in defaults below can be replaced wholesale or in
//! part by a JSON document loaded once at startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::{Category, ConditionType, Severity};
use crate::error::TriageError;

/// Keyword phrases that indicate a symptom category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KeywordGroup {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// A condition that may be suggested when its category scores high enough.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionTemplate {
    pub name: String,
    pub severity: Severity,
    pub base_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticTables {
    /// Scored in this order; the order also fixes the output order.
    pub symptom_keywords: Vec<KeywordGroup>,
    pub conditions: BTreeMap<Category, Vec<ConditionTemplate>>,
}

/// Keywords that select a condition type. Rules are tried in order and the
/// first rule with any matching keyword wins.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionRule {
    pub condition_type: ConditionType,
    pub keywords: Vec<String>,
}

/// Base full / partial / chronic outcome weights before age adjustment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OutcomeBase {
    pub full: f64,
    pub partial: f64,
    pub chronic: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecoveryModel {
    pub base_days: u32,
    pub variance: u32,
    pub complications_risk: f64,
    pub outcomes: OutcomeBase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveTables {
    pub classification_rules: Vec<ConditionRule>,
    pub recovery_models: BTreeMap<ConditionType, RecoveryModel>,
    /// Used for `general` and for any type without its own model.
    pub general: RecoveryModel,
}

impl PredictiveTables {
    pub fn model_for(&self, condition_type: ConditionType) -> &RecoveryModel {
        self.recovery_models
            .get(&condition_type)
            .unwrap_or(&self.general)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageTables {
    #[serde(default)]
    pub diagnostic: DiagnosticTables,
    #[serde(default)]
    pub predictive: PredictiveTables,
}

impl TriageTables {
    pub fn from_json(json: &str) -> Result<Self, TriageError> {
        let tables: TriageTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Reject tables that would make scores meaningless: empty keyword
    /// phrases (which match every text), confidences outside [0, 1], and
    /// outcome weights that cannot be normalized.
    pub fn validate(&self) -> Result<(), TriageError> {
        let keyword_lists = self
            .diagnostic
            .symptom_keywords
            .iter()
            .map(|g| &g.keywords)
            .chain(self.predictive.classification_rules.iter().map(|r| &r.keywords));
        for keywords in keyword_lists {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(TriageError::InvalidTables(
                    "keyword phrases must not be empty".to_string(),
                ));
            }
        }

        for (category, conditions) in &self.diagnostic.conditions {
            for condition in conditions {
                if !(0.0..=1.0).contains(&condition.base_confidence) {
                    return Err(TriageError::InvalidTables(format!(
                        "{category:?}/{}: base confidence {} is outside [0, 1]",
                        condition.name, condition.base_confidence
                    )));
                }
            }
        }

        let models = self
            .predictive
            .recovery_models
            .values()
            .chain(std::iter::once(&self.predictive.general));
        for model in models {
            let o = model.outcomes;
            if o.full < 0.0 || o.partial < 0.0 || o.chronic < 0.0 || o.full + o.partial + o.chronic <= 0.0 {
                return Err(TriageError::InvalidTables(
                    "outcome weights must be non-negative with a positive sum".to_string(),
                ));
            }
            if !(0.0..=1.0).contains(&model.complications_risk) {
                return Err(TriageError::InvalidTables(format!(
                    "complications risk {} is outside [0, 1]",
                    model.complications_risk
                )));
            }
        }

        Ok(())
    }
}

impl Default for DiagnosticTables {
    fn default() -> Self {
        Self {
            symptom_keywords: vec![
                group(
                    Category::Respiratory,
                    &["cough", "shortness of breath", "dyspnea", "wheezing", "chest pain"],
                ),
                group(
                    Category::Cardiac,
                    &["chest pain", "palpitations", "heart racing", "irregular heartbeat"],
                ),
                group(
                    Category::Neurological,
                    &["headache", "dizziness", "confusion", "seizure", "weakness"],
                ),
                group(
                    Category::Gastrointestinal,
                    &["nausea", "vomiting", "diarrhea", "abdominal pain"],
                ),
                group(
                    Category::Infectious,
                    &["fever", "chills", "fatigue", "body aches", "sore throat"],
                ),
            ],
            conditions: BTreeMap::from([
                (
                    Category::Respiratory,
                    vec![
                        condition("Common Cold", Severity::Low, 0.8),
                        condition("Influenza", Severity::Medium, 0.75),
                        condition("Pneumonia", Severity::High, 0.7),
                        condition("Bronchitis", Severity::Medium, 0.72),
                    ],
                ),
                (
                    Category::Cardiac,
                    vec![
                        condition("Chest Pain Syndrome", Severity::High, 0.85),
                        condition("Arrhythmia", Severity::Medium, 0.7),
                        condition("Angina", Severity::High, 0.8),
                    ],
                ),
                (
                    Category::Neurological,
                    vec![
                        condition("Migraine", Severity::Medium, 0.75),
                        condition("Tension Headache", Severity::Low, 0.8),
                        condition("Vertigo", Severity::Medium, 0.7),
                    ],
                ),
            ]),
        }
    }
}

impl Default for PredictiveTables {
    fn default() -> Self {
        Self {
            classification_rules: vec![
                rule(ConditionType::Cardiac, &["chest pain", "heart", "cardiac"]),
                rule(ConditionType::Respiratory, &["cough", "breathing", "respiratory"]),
                rule(ConditionType::Neurological, &["headache", "dizziness", "neurological"]),
                rule(ConditionType::Infectious, &["fever", "infection", "chills"]),
            ],
            recovery_models: BTreeMap::from([
                (ConditionType::Respiratory, model(7, 3, 0.15, (0.85, 0.12, 0.03))),
                (ConditionType::Cardiac, model(14, 7, 0.25, (0.75, 0.20, 0.05))),
                (ConditionType::Neurological, model(21, 10, 0.20, (0.70, 0.25, 0.05))),
                (ConditionType::Infectious, model(5, 2, 0.10, (0.90, 0.08, 0.02))),
            ]),
            general: model(10, 5, 0.15, (0.80, 0.15, 0.05)),
        }
    }
}

fn group(category: Category, keywords: &[&str]) -> KeywordGroup {
    KeywordGroup {
        category,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn condition(name: &str, severity: Severity, base_confidence: f64) -> ConditionTemplate {
    ConditionTemplate {
        name: name.to_string(),
        severity,
        base_confidence,
    }
}

fn rule(condition_type: ConditionType, keywords: &[&str]) -> ConditionRule {
    ConditionRule {
        condition_type,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn model(base_days: u32, variance: u32, complications_risk: f64, outcomes: (f64, f64, f64)) -> RecoveryModel {
    RecoveryModel {
        base_days,
        variance,
        complications_risk,
        outcomes: OutcomeBase {
            full: outcomes.0,
            partial: outcomes.1,
            chronic: outcomes.2,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_valid() {
        TriageTables::default().validate().unwrap();
    }

    #[test]
    fn general_model_backs_unknown_types() {
        let tables = PredictiveTables::default();
        assert_eq!(tables.model_for(ConditionType::General).base_days, 10);
        assert_eq!(tables.model_for(ConditionType::Cardiac).base_days, 14);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r#"{
            "predictive": {
                "classification_rules": [
                    { "condition_type": "infectious", "keywords": ["rash"] }
                ],
                "recovery_models": {},
                "general": {
                    "base_days": 3,
                    "variance": 1,
                    "complications_risk": 0.05,
                    "outcomes": { "full": 0.9, "partial": 0.1, "chronic": 0.0 }
                }
            }
        }"#;
        let tables = TriageTables::from_json(json).unwrap();
        assert_eq!(tables.predictive.classification_rules.len(), 1);
        assert_eq!(tables.diagnostic.symptom_keywords.len(), 5);
        assert_eq!(tables.predictive.model_for(ConditionType::Infectious).base_days, 3);
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let mut tables = TriageTables::default();
        tables.diagnostic.symptom_keywords[0].keywords.push("  ".to_string());
        assert!(matches!(tables.validate(), Err(TriageError::InvalidTables(_))));
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let mut tables = TriageTables::default();
        tables
            .diagnostic
            .conditions
            .get_mut(&Category::Cardiac)
            .unwrap()[0]
            .base_confidence = 1.5;
        assert!(matches!(tables.validate(), Err(TriageError::InvalidTables(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(TriageTables::from_json("{"), Err(TriageError::Parse(_))));
    }
}
