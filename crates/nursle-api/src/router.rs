use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;
use crate::routes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Protected routes; route_layer keeps unknown paths a 404 instead of a 401.
    let protected = Router::new()
        .route("/api/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/api/patients",
            get(routes::patients::list_patients).post(routes::patients::create_patient),
        )
        .route("/api/patients/{id}", get(routes::patients::get_patient))
        .route(
            "/api/patients/{id}/medical-history",
            get(routes::medical_history::list_medical_history)
                .post(routes::medical_history::add_medical_history),
        )
        .route(
            "/api/patients/{id}/triage",
            get(routes::triage::list_triage_records).post(routes::triage::create_triage_record),
        )
        .route("/api/symptoms/check", post(routes::symptoms::check_symptoms))
        .route("/api/analytics/triage", get(routes::analytics::triage_analytics))
        .route("/api/analytics/predictive", post(routes::analytics::predict_outcome))
        .route("/api/analytics/trends", get(routes::analytics::health_trends))
        .route("/api/ai/health", get(routes::ai::ai_health))
        .route("/api/ai/models/info", get(routes::ai::models_info))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Health (no auth)
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/api/signup", post(routes::auth::signup))
        .route("/api/login", post(routes::auth::login))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
