use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One triage encounter: what the nurse observed and what the scoring
/// pipeline suggested at the time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriageRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub nurse_id: Uuid,
    pub symptoms: String,
    /// Free-text label as entered; not every label maps to a known priority.
    pub priority: String,
    pub diagnosis: Option<String>,
    pub ai_confidence: Option<f64>,
    pub predicted_outcome: Option<String>,
    pub created_at: jiff::Timestamp,
}
