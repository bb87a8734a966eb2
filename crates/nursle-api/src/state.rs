use std::sync::Arc;

use nursle_auth::session::SessionKeys;
use nursle_storage::store::ObjectStore;
use nursle_triage::service::TriageService;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: ObjectStore,
    pub triage: Arc<TriageService>,
    pub sessions: SessionKeys,
}
