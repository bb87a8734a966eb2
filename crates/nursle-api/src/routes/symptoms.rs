use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use nursle_triage::fallback::DiagnosisFallback;
use nursle_triage::service::{AiOutcome, DiagnosisData};

use crate::error::ApiError;
use crate::middleware::auth::AuthNurse;
use crate::routes::{lenient_age, require_symptoms};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SymptomCheckRequest {
    #[serde(default)]
    pub symptoms: String,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i64>,
    pub gender: Option<String>,
}

/// Body returned when the pipeline could not answer.
#[derive(Serialize)]
pub struct SymptomCheckFallback {
    pub diagnosis: Vec<String>,
    pub recommendations: Vec<String>,
    pub escalation_criteria: Vec<String>,
    pub fallback_diagnosis: DiagnosisData,
    pub error: String,
    pub ai_status: &'static str,
}

impl SymptomCheckFallback {
    pub fn new(error: String, fallback: DiagnosisFallback) -> Self {
        Self {
            diagnosis: fallback.guidance.guidance,
            recommendations: fallback.guidance.manual_factors,
            escalation_criteria: fallback.guidance.escalation_criteria,
            fallback_diagnosis: fallback.fallback_diagnosis,
            error,
            ai_status: "unavailable",
        }
    }
}

pub async fn check_symptoms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthNurse>,
    Json(req): Json<SymptomCheckRequest>,
) -> Result<Response, ApiError> {
    let symptoms = require_symptoms(&req.symptoms)?;

    let span = tracing::info_span!("symptom_check", nurse_id = %auth.nurse_id);
    let outcome = span.in_scope(|| state.triage.diagnose(symptoms, req.age, req.gender.as_deref()));

    Ok(match outcome {
        AiOutcome::Success { data, .. } => Json(data).into_response(),
        AiOutcome::Unavailable { error, fallback_data } => {
            Json(SymptomCheckFallback::new(error, fallback_data)).into_response()
        }
    })
}
