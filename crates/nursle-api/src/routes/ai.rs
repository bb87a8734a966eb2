use axum::extract::State;
use axum::Json;

use nursle_triage::service::{ModelsInfo, ServiceHealth};

use crate::state::AppState;

pub async fn ai_health(State(state): State<AppState>) -> Json<ServiceHealth> {
    Json(state.triage.health())
}

pub async fn models_info(State(state): State<AppState>) -> Json<ModelsInfo> {
    Json(state.triage.models_info())
}
