use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nursle_core::models::medical_history::{parse_diagnosis_date, MedicalHistory, DEFAULT_STATUS};
use nursle_storage::records;

use crate::error::ApiError;
use crate::routes::patients::load_patient;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddHistoryRequest {
    #[serde(default)]
    pub condition: String,
    /// ISO-8601 date or datetime; absent or unparseable means now.
    pub diagnosis_date: Option<String>,
    #[serde(default)]
    pub treatment: String,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct AddHistoryResponse {
    pub id: Uuid,
    pub message: String,
}

pub async fn add_medical_history(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<AddHistoryRequest>,
) -> Result<(StatusCode, Json<AddHistoryResponse>), ApiError> {
    load_patient(&state, patient_id).await?;

    let now = jiff::Timestamp::now();
    let diagnosis_date = match req.diagnosis_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_diagnosis_date(raw).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unparseable diagnosis date, using now");
            now
        }),
        _ => now,
    };

    let entry = MedicalHistory {
        id: Uuid::new_v4(),
        patient_id,
        condition: req.condition.trim().to_string(),
        diagnosis_date,
        treatment: req.treatment,
        status: req
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        created_at: now,
    };
    records::put_medical_history(&state.store, &entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddHistoryResponse {
            id: entry.id,
            message: "Medical history added successfully".to_string(),
        }),
    ))
}

pub async fn list_medical_history(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<MedicalHistory>>, ApiError> {
    load_patient(&state, patient_id).await?;
    Ok(Json(records::list_medical_history(&state.store, patient_id).await?))
}
