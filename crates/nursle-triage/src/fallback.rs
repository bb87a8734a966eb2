//! Static payloads served when the scoring pipeline cannot answer.

use serde::{Deserialize, Serialize};

use crate::category::Severity;
use crate::prediction::RiskLevel;
use crate::service::{ConfidenceLabel, DiagnosisData, FormattedDiagnosis, DIAGNOSIS_DISCLAIMER};

pub const UNAVAILABLE_ERROR: &str = "AI service temporarily unavailable";
pub const DISABLED_ERROR: &str = "AI service is disabled";

/// Checklist for a nurse assessing without AI support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAssessmentGuidance {
    pub guidance: Vec<String>,
    pub manual_factors: Vec<String>,
    pub escalation_criteria: Vec<String>,
}

impl ManualAssessmentGuidance {
    pub fn standard() -> Self {
        Self {
            guidance: strings(&[
                "AI service is temporarily unavailable",
                "Please proceed with standard clinical assessment protocols",
                "Consider the following manual triage factors:",
            ]),
            manual_factors: strings(&[
                "Vital signs (temperature, blood pressure, heart rate, respiratory rate)",
                "Pain level assessment (1-10 scale)",
                "Patient mobility and consciousness level",
                "Medical history and current medications",
                "Duration and progression of symptoms",
            ]),
            escalation_criteria: strings(&[
                "Severe chest pain or difficulty breathing",
                "Signs of stroke or neurological deficits",
                "Severe bleeding or trauma",
                "Loss of consciousness or altered mental state",
                "Vital signs outside normal ranges",
            ]),
        }
    }
}

/// Fallback for a failed diagnosis: a placeholder "needs evaluation" result
/// plus the manual assessment checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisFallback {
    pub fallback_diagnosis: DiagnosisData,
    pub guidance: ManualAssessmentGuidance,
}

impl DiagnosisFallback {
    pub fn standard() -> Self {
        Self {
            fallback_diagnosis: fallback_diagnosis(),
            guidance: ManualAssessmentGuidance::standard(),
        }
    }
}

pub fn fallback_diagnosis() -> DiagnosisData {
    DiagnosisData {
        diagnosis: vec![FormattedDiagnosis {
            condition: "Medical Evaluation Needed".to_string(),
            confidence: 0.5,
            severity: Severity::Medium,
            confidence_label: ConfidenceLabel::from_confidence(0.5),
            category: None,
        }],
        recommendations: strings(&[
            "AI service temporarily unavailable",
            "Please conduct manual assessment",
            "Consult with attending physician",
        ]),
        overall_confidence: 0.5,
        disclaimer: DIAGNOSIS_DISCLAIMER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRecovery {
    pub estimated_days: i64,
    pub confidence: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRisk {
    pub risk_level: RiskLevel,
    pub probability: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardResources {
    pub bed_days: i64,
    pub specialist_required: bool,
    pub follow_up_visits: i64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardOutcome {
    pub full_recovery: f64,
    pub partial_recovery: f64,
    pub chronic_condition: f64,
    pub note: String,
}

/// Population-level prediction used when the predictor fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardPrediction {
    pub recovery_time: StandardRecovery,
    pub complications_risk: StandardRisk,
    pub resource_needs: StandardResources,
    pub outcome_prediction: StandardOutcome,
}

impl StandardPrediction {
    pub fn standard() -> Self {
        Self {
            recovery_time: StandardRecovery {
                estimated_days: 7,
                confidence: 0.5,
                note: "Standard estimate - clinical assessment recommended".to_string(),
            },
            complications_risk: StandardRisk {
                risk_level: RiskLevel::Medium,
                probability: 0.2,
                note: "Default risk assessment - please evaluate clinically".to_string(),
            },
            resource_needs: StandardResources {
                bed_days: 2,
                specialist_required: true,
                follow_up_visits: 2,
                note: "Standard resource allocation - adjust based on clinical judgment".to_string(),
            },
            outcome_prediction: StandardOutcome {
                full_recovery: 0.8,
                partial_recovery: 0.15,
                chronic_condition: 0.05,
                note: "Population-based averages - individual outcomes may vary".to_string(),
            },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
