use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Session validation middleware.
///
/// Extracts the `Authorization: Bearer <token>` header and validates the
/// session token. On success, inserts `AuthNurse` into request extensions
/// for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(ApiError::unauthorized)?;

        state.sessions.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected session token");
            ApiError::unauthorized()
        })?
    };

    let nurse_id = claims.nurse_id().map_err(|_| ApiError::unauthorized())?;
    req.extensions_mut().insert(AuthNurse { nurse_id });

    Ok(next.run(req).await)
}

/// Signed-in nurse, taken from the session token.
#[derive(Clone, Copy, Debug)]
pub struct AuthNurse {
    pub nurse_id: Uuid,
}
