use nursle_core::models::priority::Priority;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::{Category, ConditionType};
use crate::classifier::{classify_condition_type, score_categories, CategoryScore};
use crate::diagnosis::{generate_diagnoses, DiagnosisCandidate, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::error::TriageError;
use crate::prediction::{
    assess_complications_risk, calculate_outcome_probabilities, predict_recovery_time,
    predict_resource_requirements, PredictionBundle,
};
use crate::recommendations::recommendations_for;
use crate::tables::{DiagnosticTables, PredictiveTables};

/// Age assumed when none is given. Zero is treated as "not given".
pub const DEFAULT_AGE: i64 = 30;
pub const DEFAULT_GENDER: &str = "Unknown";
pub const DEFAULT_PRIORITY: &str = "Medium";

pub const DIAGNOSTIC_VERSION: &str = "diagnostic_v1.0";
pub const PREDICTIVE_VERSION: &str = "predictive_v1.0";

/// Request-scoped input to both pipelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SymptomInput {
    pub symptoms: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub priority: Option<String>,
}

impl SymptomInput {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            ..Self::default()
        }
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn effective_age(&self) -> i64 {
        self.age.filter(|&a| a != 0).unwrap_or(DEFAULT_AGE)
    }

    pub fn effective_gender(&self) -> &str {
        self.gender
            .as_deref()
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_GENDER)
    }

    pub fn effective_priority(&self) -> &str {
        self.priority
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PRIORITY)
    }
}

/// A versioned scoring pipeline.
pub trait TriageModel: Send + Sync {
    type Output;

    fn model_version(&self) -> &str;

    /// Timestamp the model's tables were loaded.
    fn loaded_at(&self) -> jiff::Timestamp;

    fn process(&self, input: &SymptomInput) -> Result<Self::Output, TriageError>;

    /// Symptoms are required and must contain more than whitespace.
    fn validate_input(&self, input: &SymptomInput) -> Result<(), TriageError> {
        if input.symptoms.trim().is_empty() {
            return Err(TriageError::MissingSymptoms);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisReport {
    pub diagnosis: Vec<DiagnosisCandidate>,
    pub recommendations: Vec<String>,
    /// Highest candidate confidence, or 0 when there are none.
    pub confidence: f64,
    pub category_scores: Vec<CategoryScore>,
}

pub struct DiagnosticEngine {
    tables: DiagnosticTables,
    confidence_threshold: f64,
    loaded_at: jiff::Timestamp,
}

impl DiagnosticEngine {
    pub fn new(tables: DiagnosticTables, confidence_threshold: f64) -> Self {
        Self {
            tables,
            confidence_threshold,
            loaded_at: jiff::Timestamp::now(),
        }
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    pub fn supported_categories(&self) -> Vec<Category> {
        self.tables
            .symptom_keywords
            .iter()
            .map(|g| g.category)
            .collect()
    }
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new(DiagnosticTables::default(), DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl TriageModel for DiagnosticEngine {
    type Output = DiagnosisReport;

    fn model_version(&self) -> &str {
        DIAGNOSTIC_VERSION
    }

    fn loaded_at(&self) -> jiff::Timestamp {
        self.loaded_at
    }

    fn process(&self, input: &SymptomInput) -> Result<DiagnosisReport, TriageError> {
        self.validate_input(input)?;

        let category_scores = score_categories(&input.symptoms, &self.tables.symptom_keywords);
        let diagnosis = generate_diagnoses(
            &category_scores,
            &self.tables.conditions,
            input.effective_age(),
            input.effective_gender(),
            self.confidence_threshold,
        );
        let recommendations = recommendations_for(&diagnosis);
        let confidence = diagnosis
            .iter()
            .map(|d| d.confidence)
            .fold(0.0, f64::max);

        Ok(DiagnosisReport {
            diagnosis,
            recommendations,
            confidence,
            category_scores,
        })
    }
}

pub struct PredictiveEngine {
    tables: PredictiveTables,
    loaded_at: jiff::Timestamp,
}

impl PredictiveEngine {
    pub fn new(tables: PredictiveTables) -> Self {
        Self {
            tables,
            loaded_at: jiff::Timestamp::now(),
        }
    }

    /// Condition types with a dedicated recovery model. `general` is the
    /// fallback and is not listed.
    pub fn supported_conditions(&self) -> Vec<ConditionType> {
        self.tables.recovery_models.keys().copied().collect()
    }
}

impl Default for PredictiveEngine {
    fn default() -> Self {
        Self::new(PredictiveTables::default())
    }
}

impl TriageModel for PredictiveEngine {
    type Output = PredictionBundle;

    fn model_version(&self) -> &str {
        PREDICTIVE_VERSION
    }

    fn loaded_at(&self) -> jiff::Timestamp {
        self.loaded_at
    }

    fn process(&self, input: &SymptomInput) -> Result<PredictionBundle, TriageError> {
        self.validate_input(input)?;

        let condition_type = classify_condition_type(&input.symptoms, &self.tables.classification_rules);
        let model = self.tables.model_for(condition_type);
        let age = input.effective_age();
        let priority = Priority::from_label(input.effective_priority());

        let recovery_time = predict_recovery_time(model, age, priority);
        let complications_risk = assess_complications_risk(model, age);
        let resource_needs = predict_resource_requirements(condition_type, recovery_time.estimated_days);
        let outcome_prediction = calculate_outcome_probabilities(model, age);

        Ok(PredictionBundle {
            recovery_time,
            complications_risk,
            resource_needs,
            outcome_prediction,
            condition_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_age_falls_back_to_default() {
        assert_eq!(SymptomInput::new("x").with_age(0).effective_age(), DEFAULT_AGE);
        assert_eq!(SymptomInput::new("x").effective_age(), DEFAULT_AGE);
        assert_eq!(SymptomInput::new("x").with_age(4).effective_age(), 4);
    }

    #[test]
    fn empty_labels_fall_back_to_defaults() {
        let input = SymptomInput::new("x").with_gender("").with_priority("");
        assert_eq!(input.effective_gender(), DEFAULT_GENDER);
        assert_eq!(input.effective_priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn blank_symptoms_are_rejected_by_both_engines() {
        let input = SymptomInput::new("   ");
        assert!(matches!(
            DiagnosticEngine::default().process(&input),
            Err(TriageError::MissingSymptoms)
        ));
        assert!(matches!(
            PredictiveEngine::default().process(&input),
            Err(TriageError::MissingSymptoms)
        ));
    }

    #[test]
    fn overall_confidence_is_best_candidate() {
        let input = SymptomInput::new("chest pain, palpitations and heart racing").with_age(70);
        let report = DiagnosticEngine::default().process(&input).unwrap();
        assert_eq!(report.confidence, report.diagnosis[0].confidence);

        let none = DiagnosticEngine::default()
            .process(&SymptomInput::new("sprained ankle"))
            .unwrap();
        assert_eq!(none.confidence, 0.0);
    }

    #[test]
    fn lower_threshold_admits_more_candidates() {
        let input = SymptomInput::new("cough, wheezing and dyspnea");
        let strict = DiagnosticEngine::default().process(&input).unwrap();
        let lenient = DiagnosticEngine::new(DiagnosticTables::default(), 0.3)
            .process(&input)
            .unwrap();
        assert!(strict.diagnosis.is_empty());
        assert_eq!(lenient.diagnosis.len(), 4);
    }

    #[test]
    fn supported_conditions_exclude_general() {
        let conditions = PredictiveEngine::default().supported_conditions();
        assert_eq!(conditions.len(), 4);
        assert!(!conditions.contains(&ConditionType::General));
    }
}
