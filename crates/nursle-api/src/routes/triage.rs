use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use nursle_core::models::priority::Priority;
use nursle_core::models::triage_record::TriageRecord;
use nursle_storage::records;
use nursle_triage::engine::DEFAULT_PRIORITY;
use nursle_triage::service::{AiOutcome, DiagnosisData, PredictionData};

use crate::error::ApiError;
use crate::middleware::auth::AuthNurse;
use crate::routes::patients::load_patient;
use crate::routes::require_symptoms;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TriageRequest {
    #[serde(default)]
    pub symptoms: String,
    pub priority: Option<String>,
}

/// Run both pipelines against a patient and store the result.
pub async fn create_triage_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthNurse>,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<TriageRequest>,
) -> Result<(StatusCode, Json<TriageRecord>), ApiError> {
    let symptoms = require_symptoms(&req.symptoms)?.trim().to_string();
    let patient = load_patient(&state, patient_id).await?;

    let priority = req
        .priority
        .as_deref()
        .and_then(Priority::from_label)
        .map_or(DEFAULT_PRIORITY, |p| p.as_str());

    let span = tracing::info_span!("patient_triage", nurse_id = %auth.nurse_id, patient_id = %patient.id);
    let (diagnosis, prediction) = span.in_scope(|| {
        (
            state.triage.diagnose(&symptoms, Some(patient.age), Some(patient.gender.as_str())),
            state.triage.predict(&symptoms, Some(patient.age), Some(priority)),
        )
    });

    if !diagnosis.is_success() || !prediction.is_success() {
        tracing::warn!(patient_id = %patient.id, "storing triage record without full AI output");
    }

    let (diagnosis, ai_confidence) = match diagnosis.data() {
        Some(data) => top_condition(data),
        None => (None, None),
    };
    let predicted_outcome = match &prediction {
        AiOutcome::Success { data, .. } => Some(outcome_summary(data)),
        AiOutcome::Unavailable { .. } => None,
    };

    let record = TriageRecord {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        nurse_id: auth.nurse_id,
        symptoms,
        priority: priority.to_string(),
        diagnosis,
        ai_confidence,
        predicted_outcome,
        created_at: jiff::Timestamp::now(),
    };
    records::put_triage_record(&state.store, &record).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_triage_records(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<TriageRecord>>, ApiError> {
    load_patient(&state, patient_id).await?;
    Ok(Json(records::list_triage_records(&state.store, patient_id).await?))
}

fn top_condition(data: &DiagnosisData) -> (Option<String>, Option<f64>) {
    let condition = data.diagnosis.first().map(|d| d.condition.clone());
    (condition, Some(data.overall_confidence))
}

fn outcome_summary(data: &PredictionData) -> String {
    format!(
        "{}: about {} days to recover, {:?} complications risk",
        data.condition_type, data.recovery_time.estimated_days, data.complications_risk.risk_level
    )
}
