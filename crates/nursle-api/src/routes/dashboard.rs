use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use nursle_storage::error::StorageError;
use nursle_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthNurse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub first_name: String,
    pub email: String,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthNurse>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let nurse = match records::get_nurse(&state.store, auth.nurse_id).await {
        Ok(nurse) => nurse,
        Err(StorageError::NotFound { .. }) => {
            return Err(ApiError::NotFound("Nurse not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(DashboardResponse {
        first_name: nurse.first_name().to_string(),
        email: nurse.email,
    }))
}
