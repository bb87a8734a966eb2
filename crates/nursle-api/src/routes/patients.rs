use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nursle_core::models::patient::Patient;
use nursle_storage::error::StorageError;
use nursle_storage::records;

use crate::error::ApiError;
use crate::routes::lenient_age;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: String,
}

#[derive(Serialize)]
pub struct CreatePatientResponse {
    pub patient_id: Uuid,
    pub message: String,
}

pub async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<CreatePatientResponse>), ApiError> {
    let patient = Patient {
        id: Uuid::new_v4(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        age: req.age.unwrap_or(0),
        gender: req.gender.trim().to_string(),
        created_at: jiff::Timestamp::now(),
    };
    records::put_patient(&state.store, &patient).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientResponse {
            patient_id: patient.id,
            message: "Patient created successfully".to_string(),
        }),
    ))
}

pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(records::list_patients(&state.store).await?))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(load_patient(&state, id).await?))
}

/// Load a patient, mapping a missing record to a 404.
pub async fn load_patient(state: &AppState, id: Uuid) -> Result<Patient, ApiError> {
    match records::get_patient(&state.store, id).await {
        Ok(patient) => Ok(patient),
        Err(StorageError::NotFound { .. }) => Err(ApiError::NotFound("Patient not found".to_string())),
        Err(e) => Err(e.into()),
    }
}
