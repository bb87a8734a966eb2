//! Error-bounded façade over the diagnostic and predictive engines.
//!
//! Callers never see a pipeline failure: any error or panic inside an engine
//! is logged and answered with a static fallback payload.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::category::{Category, ConditionType, Severity};
use crate::diagnosis::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::engine::{DiagnosisReport, DiagnosticEngine, PredictiveEngine, SymptomInput, TriageModel};
use crate::error::TriageError;
use crate::fallback::{DiagnosisFallback, StandardPrediction, DISABLED_ERROR, UNAVAILABLE_ERROR};
use crate::prediction::{ComplicationsRisk, OutcomeProbabilities, PredictionBundle, RecoveryEstimate, ResourceNeeds};
use crate::tables::TriageTables;

pub const DIAGNOSIS_DISCLAIMER: &str = "This AI analysis is for informational purposes only and should not replace professional medical diagnosis.";
pub const PREDICTION_DISCLAIMER: &str = "These predictions are based on statistical models and should be used as guidance alongside clinical judgment.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// When false every request is answered with the fallback payload.
    pub enabled: bool,
    pub log_predictions: bool,
    pub confidence_threshold: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_predictions: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ConfidenceLabel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            Self::VeryHigh
        } else if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.7 {
            Self::Moderate
        } else if confidence >= 0.6 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedDiagnosis {
    pub condition: String,
    pub confidence: f64,
    pub severity: Severity,
    pub confidence_label: ConfidenceLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Diagnosis payload as presented to the nurse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisData {
    pub diagnosis: Vec<FormattedDiagnosis>,
    pub recommendations: Vec<String>,
    pub overall_confidence: f64,
    pub disclaimer: String,
}

impl From<DiagnosisReport> for DiagnosisData {
    fn from(report: DiagnosisReport) -> Self {
        let diagnosis = report
            .diagnosis
            .into_iter()
            .map(|d| FormattedDiagnosis {
                confidence_label: ConfidenceLabel::from_confidence(d.confidence),
                condition: d.condition,
                confidence: d.confidence,
                severity: d.severity,
                category: Some(d.category),
            })
            .collect();

        Self {
            diagnosis,
            recommendations: report.recommendations,
            overall_confidence: report.confidence,
            disclaimer: DIAGNOSIS_DISCLAIMER.to_string(),
        }
    }
}

/// Prediction payload as presented to the nurse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionData {
    pub recovery_time: RecoveryEstimate,
    pub complications_risk: ComplicationsRisk,
    pub resource_needs: ResourceNeeds,
    pub outcome_prediction: OutcomeProbabilities,
    pub condition_type: ConditionType,
    pub disclaimer: String,
}

impl From<PredictionBundle> for PredictionData {
    fn from(bundle: PredictionBundle) -> Self {
        Self {
            recovery_time: bundle.recovery_time,
            complications_risk: bundle.complications_risk,
            resource_needs: bundle.resource_needs,
            outcome_prediction: bundle.outcome_prediction,
            condition_type: bundle.condition_type,
            disclaimer: PREDICTION_DISCLAIMER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMetadata {
    pub model_version: String,
    pub processing_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<ConditionType>,
}

/// Result of a façade call. Both variants are normal answers.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome<T, F> {
    Success { data: T, metadata: AiMetadata },
    Unavailable { error: String, fallback_data: F },
}

impl<T, F> AiOutcome<T, F> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub diagnostic: bool,
    pub predictive: bool,
    pub voice: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub services: ServiceStatus,
    pub diagnostic_version: String,
    pub predictive_version: String,
    pub last_updated: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticModelInfo {
    pub version: String,
    pub confidence_threshold: f64,
    pub supported_categories: Vec<Category>,
    pub last_updated: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveModelInfo {
    pub version: String,
    pub supported_conditions: Vec<ConditionType>,
    pub last_updated: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsInfo {
    pub diagnostic_engine: DiagnosticModelInfo,
    pub predictive_analytics: PredictiveModelInfo,
}

/// Explicitly constructed triage service, shared by request handlers.
pub struct TriageService {
    diagnostic: DiagnosticEngine,
    predictive: PredictiveEngine,
    config: AiConfig,
}

impl TriageService {
    pub fn new(tables: TriageTables, config: AiConfig) -> Self {
        Self {
            diagnostic: DiagnosticEngine::new(tables.diagnostic, config.confidence_threshold),
            predictive: PredictiveEngine::new(tables.predictive),
            config,
        }
    }

    pub fn diagnose(
        &self,
        symptoms: &str,
        age: Option<i64>,
        gender: Option<&str>,
    ) -> AiOutcome<DiagnosisData, DiagnosisFallback> {
        let input = SymptomInput {
            symptoms: symptoms.to_string(),
            age,
            gender: gender.map(str::to_string),
            priority: None,
        };

        if !self.config.enabled {
            return AiOutcome::Unavailable {
                error: DISABLED_ERROR.to_string(),
                fallback_data: DiagnosisFallback::standard(),
            };
        }

        let start = Instant::now();
        match run_guarded(&self.diagnostic, &input) {
            Ok(report) => {
                let processing_time_ms = elapsed_ms(start);
                if self.config.log_predictions {
                    log_prediction("diagnosis", &self.diagnostic, &input, report.confidence, processing_time_ms);
                }
                AiOutcome::Success {
                    data: report.into(),
                    metadata: AiMetadata {
                        model_version: self.diagnostic.model_version().to_string(),
                        processing_time_ms,
                        confidence_threshold: Some(self.diagnostic.confidence_threshold()),
                        condition_type: None,
                    },
                }
            }
            Err(e) => {
                tracing::error!(error = %e, prediction_type = "diagnosis", "AI symptom check failed");
                AiOutcome::Unavailable {
                    error: UNAVAILABLE_ERROR.to_string(),
                    fallback_data: DiagnosisFallback::standard(),
                }
            }
        }
    }

    pub fn predict(
        &self,
        symptoms: &str,
        age: Option<i64>,
        priority: Option<&str>,
    ) -> AiOutcome<PredictionData, StandardPrediction> {
        let input = SymptomInput {
            symptoms: symptoms.to_string(),
            age,
            gender: None,
            priority: priority.map(str::to_string),
        };

        if !self.config.enabled {
            return AiOutcome::Unavailable {
                error: DISABLED_ERROR.to_string(),
                fallback_data: StandardPrediction::standard(),
            };
        }

        let start = Instant::now();
        match run_guarded(&self.predictive, &input) {
            Ok(bundle) => {
                let processing_time_ms = elapsed_ms(start);
                if self.config.log_predictions {
                    log_prediction(
                        "predictive",
                        &self.predictive,
                        &input,
                        bundle.recovery_time.confidence,
                        processing_time_ms,
                    );
                }
                let condition_type = bundle.condition_type;
                AiOutcome::Success {
                    data: bundle.into(),
                    metadata: AiMetadata {
                        model_version: self.predictive.model_version().to_string(),
                        processing_time_ms,
                        confidence_threshold: None,
                        condition_type: Some(condition_type),
                    },
                }
            }
            Err(e) => {
                tracing::error!(error = %e, prediction_type = "predictive", "AI predictive analytics failed");
                AiOutcome::Unavailable {
                    error: UNAVAILABLE_ERROR.to_string(),
                    fallback_data: StandardPrediction::standard(),
                }
            }
        }
    }

    /// Static availability report; no sub-service is actually probed.
    pub fn health(&self) -> ServiceHealth {
        ServiceHealth {
            services: ServiceStatus {
                diagnostic: true,
                predictive: true,
                voice: false,
            },
            diagnostic_version: self.diagnostic.model_version().to_string(),
            predictive_version: self.predictive.model_version().to_string(),
            last_updated: jiff::Timestamp::now(),
        }
    }

    pub fn models_info(&self) -> ModelsInfo {
        ModelsInfo {
            diagnostic_engine: DiagnosticModelInfo {
                version: self.diagnostic.model_version().to_string(),
                confidence_threshold: self.diagnostic.confidence_threshold(),
                supported_categories: self.diagnostic.supported_categories(),
                last_updated: self.diagnostic.loaded_at(),
            },
            predictive_analytics: PredictiveModelInfo {
                version: self.predictive.model_version().to_string(),
                supported_conditions: self.predictive.supported_conditions(),
                last_updated: self.predictive.loaded_at(),
            },
        }
    }
}

impl Default for TriageService {
    fn default() -> Self {
        Self::new(TriageTables::default(), AiConfig::default())
    }
}

/// Failure of a guarded pipeline run.
#[derive(Debug)]
enum PipelineFailure {
    Error(TriageError),
    Panic(String),
}

impl std::fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{e}"),
            Self::Panic(msg) => write!(f, "pipeline panicked: {msg}"),
        }
    }
}

fn run_guarded<M: TriageModel>(model: &M, input: &SymptomInput) -> Result<M::Output, PipelineFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| model.process(input))) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(PipelineFailure::Error(e)),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(PipelineFailure::Panic(msg))
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn log_prediction<M: TriageModel>(
    prediction_type: &str,
    model: &M,
    input: &SymptomInput,
    confidence: f64,
    processing_time_ms: f64,
) {
    let mut hasher = DefaultHasher::new();
    input.symptoms.hash(&mut hasher);
    input.age.hash(&mut hasher);
    input.gender.hash(&mut hasher);
    input.priority.hash(&mut hasher);

    tracing::info!(
        prediction_type,
        model_version = model.model_version(),
        input_hash = hasher.finish(),
        confidence,
        processing_time_ms,
        "ai_prediction"
    );
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::Layer;

    use super::*;

    #[test]
    fn confidence_labels() {
        assert_eq!(ConfidenceLabel::from_confidence(0.95), ConfidenceLabel::VeryHigh);
        assert_eq!(ConfidenceLabel::from_confidence(0.8), ConfidenceLabel::High);
        assert_eq!(ConfidenceLabel::from_confidence(0.701), ConfidenceLabel::Moderate);
        assert_eq!(ConfidenceLabel::from_confidence(0.6), ConfidenceLabel::Low);
        assert_eq!(ConfidenceLabel::from_confidence(0.59), ConfidenceLabel::VeryLow);
    }

    #[test]
    fn confidence_label_serializes_with_spaces() {
        let json = serde_json::to_string(&ConfidenceLabel::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
    }

    struct Exploding;

    impl TriageModel for Exploding {
        type Output = ();

        fn model_version(&self) -> &str {
            "exploding"
        }

        fn loaded_at(&self) -> jiff::Timestamp {
            jiff::Timestamp::UNIX_EPOCH
        }

        fn process(&self, _input: &SymptomInput) -> Result<(), TriageError> {
            panic!("table corrupted");
        }
    }

    #[test]
    fn panics_are_contained() {
        let failure = run_guarded(&Exploding, &SymptomInput::new("cough")).unwrap_err();
        assert_eq!(failure.to_string(), "pipeline panicked: table corrupted");
    }

    /// Records `span/message` for every event.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S> Layer<S> for Captured
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            let span = ctx.event_span(event).map(|s| s.name()).unwrap_or("-");
            self.0.lock().unwrap().push(format!("{span}/{}", visitor.0));
        }
    }

    fn capture(config: AiConfig, run: impl FnOnce(&TriageService)) -> Vec<String> {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let service = TriageService::new(TriageTables::default(), config);
        tracing::subscriber::with_default(subscriber, || run(&service));
        let events = captured.0.lock().unwrap().clone();
        events
    }

    #[test]
    fn predictions_are_logged_inside_the_caller_span() {
        let events = capture(AiConfig::default(), |service| {
            let span = tracing::info_span!("symptom_check", nurse_id = "n-1");
            span.in_scope(|| {
                service.diagnose("cough and fever", Some(30), None);
                service.predict("cough and fever", Some(30), None);
            });
        });
        assert_eq!(events, vec!["symptom_check/ai_prediction", "symptom_check/ai_prediction"]);
    }

    #[test]
    fn prediction_logging_can_be_switched_off() {
        let config = AiConfig {
            log_predictions: false,
            ..AiConfig::default()
        };
        let events = capture(config, |service| {
            assert!(service.diagnose("cough and fever", Some(30), None).is_success());
            assert!(service.predict("cough and fever", Some(30), None).is_success());
        });
        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn failed_diagnosis_is_logged_as_error() {
        let events = capture(AiConfig::default(), |service| {
            assert!(!service.diagnose("  ", None, None).is_success());
        });
        assert_eq!(events, vec!["-/AI symptom check failed"]);
    }

    #[test]
    fn disabled_service_serves_fallbacks() {
        let service = TriageService::new(
            TriageTables::default(),
            AiConfig {
                enabled: false,
                ..AiConfig::default()
            },
        );
        match service.diagnose("cough", None, None) {
            AiOutcome::Unavailable { error, .. } => assert_eq!(error, DISABLED_ERROR),
            other => panic!("expected fallback, got {other:?}"),
        }
        assert!(!service.predict("cough", None, None).is_success());
    }
}
