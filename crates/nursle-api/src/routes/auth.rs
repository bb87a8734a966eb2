use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nursle_auth::password::{hash_password, verify_password};
use nursle_core::models::nurse::{normalize_email, Nurse};
use nursle_storage::error::StorageError;
use nursle_storage::records;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    /// Staff badge number.
    #[serde(default)]
    pub nurse_id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let nurse = Nurse {
        id: Uuid::new_v4(),
        full_name: req.full_name.trim().to_string(),
        email,
        staff_number: req.nurse_id.trim().to_string(),
        password_hash,
        created_at: jiff::Timestamp::now(),
    };

    match records::create_nurse(&state.store, &nurse).await {
        Ok(()) => {}
        Err(StorageError::AlreadyExists { .. }) => {
            return Err(ApiError::BadRequest("Email already registered".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(nurse_id = %nurse.id, "nurse registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Signup successful".to_string(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub first_name: String,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let nurse = records::find_nurse_by_email(&state.store, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let password = req.password;
    let stored_hash = nurse.password_hash.clone();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await??;

    let token = state.sessions.issue(nurse.id)?;
    tracing::info!(nurse_id = %nurse.id, "nurse signed in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        first_name: nurse.first_name().to_string(),
        token,
    }))
}
