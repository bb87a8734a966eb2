use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::ToSpan;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use nursle_core::models::priority::Priority;
use nursle_core::models::triage_record::TriageRecord;
use nursle_storage::records;
use nursle_triage::fallback::StandardPrediction;
use nursle_triage::service::AiOutcome;

use crate::error::ApiError;
use crate::middleware::auth::AuthNurse;
use crate::routes::{lenient_age, require_symptoms};
use crate::state::AppState;

const WEEK_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct PredictiveRequest {
    #[serde(default)]
    pub symptoms: String,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i64>,
    pub priority: Option<String>,
}

#[derive(Serialize)]
pub struct PredictiveFallback {
    #[serde(flatten)]
    pub standard: StandardPrediction,
    pub error: String,
    pub ai_status: &'static str,
}

pub async fn predict_outcome(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthNurse>,
    Json(req): Json<PredictiveRequest>,
) -> Result<Response, ApiError> {
    let symptoms = require_symptoms(&req.symptoms)?;

    let span = tracing::info_span!("predictive_analytics", nurse_id = %auth.nurse_id);
    let outcome = span.in_scope(|| state.triage.predict(symptoms, req.age, req.priority.as_deref()));

    Ok(match outcome {
        AiOutcome::Success { data, .. } => Json(data).into_response(),
        AiOutcome::Unavailable { error, fallback_data } => Json(PredictiveFallback {
            standard: fallback_data,
            error,
            ai_status: "unavailable",
        })
        .into_response(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: Date,
    pub total_patients: u32,
    pub high_priority: u32,
    pub medium_priority: u32,
    pub low_priority: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub total_patients_week: u32,
    pub high_priority_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageAnalytics {
    pub daily_stats: Vec<DailyStats>,
    pub summary: WeeklySummary,
}

pub async fn triage_analytics(State(state): State<AppState>) -> Result<Json<TriageAnalytics>, ApiError> {
    let records = records::list_all_triage_records(&state.store).await?;
    let today = jiff::Timestamp::now().to_zoned(TimeZone::UTC).date();
    Ok(Json(summarize_week(&records, today)))
}

/// Per-day priority counts for the seven days ending at `today`, newest
/// first. Records outside the window are ignored.
pub fn summarize_week(records: &[TriageRecord], today: Date) -> TriageAnalytics {
    let mut daily_stats: Vec<DailyStats> = (0..WEEK_DAYS)
        .map(|offset| DailyStats {
            date: today.saturating_sub(offset.days()),
            total_patients: 0,
            high_priority: 0,
            medium_priority: 0,
            low_priority: 0,
        })
        .collect();

    for record in records {
        let day = record.created_at.to_zoned(TimeZone::UTC).date();
        let Some(stats) = daily_stats.iter_mut().find(|s| s.date == day) else {
            continue;
        };
        stats.total_patients += 1;
        match Priority::from_label(&record.priority) {
            Some(Priority::High) => stats.high_priority += 1,
            Some(Priority::Medium) => stats.medium_priority += 1,
            Some(Priority::Low) => stats.low_priority += 1,
            None => {}
        }
    }

    let total: u32 = daily_stats.iter().map(|s| s.total_patients).sum();
    let high: u32 = daily_stats.iter().map(|s| s.high_priority).sum();
    let high_priority_percentage = if total == 0 {
        0.0
    } else {
        (f64::from(high) / f64::from(total) * 1000.0).round() / 10.0
    };

    TriageAnalytics {
        daily_stats,
        summary: WeeklySummary {
            total_patients_week: total,
            high_priority_percentage,
        },
    }
}

/// Seasonal and demographic reference data.
pub async fn health_trends() -> Json<Value> {
    Json(json!({
        "seasonal_patterns": [
            { "month": "January", "respiratory_cases": 45, "flu_cases": 32 },
            { "month": "February", "respiratory_cases": 38, "flu_cases": 28 },
            { "month": "March", "respiratory_cases": 25, "flu_cases": 15 },
            { "month": "April", "respiratory_cases": 18, "flu_cases": 8 },
            { "month": "May", "respiratory_cases": 12, "flu_cases": 5 }
        ],
        "demographic_insights": {
            "age_groups": [
                { "range": "0-18", "high_risk_conditions": ["Asthma", "Allergies"] },
                { "range": "19-35", "high_risk_conditions": ["Stress-related", "Sports injuries"] },
                { "range": "36-60", "high_risk_conditions": ["Hypertension", "Diabetes"] },
                { "range": "60+", "high_risk_conditions": ["Cardiovascular", "Respiratory"] }
            ]
        }
    }))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn record(created_at: &str, priority: &str) -> TriageRecord {
        TriageRecord {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            nurse_id: Uuid::new_v4(),
            symptoms: "cough".to_string(),
            priority: priority.to_string(),
            diagnosis: None,
            ai_confidence: None,
            predicted_outcome: None,
            created_at: created_at.parse().unwrap(),
        }
    }

    #[test]
    fn empty_week_has_seven_zeroed_days() {
        let today = jiff::civil::date(2024, 3, 10);
        let analytics = summarize_week(&[], today);
        assert_eq!(analytics.daily_stats.len(), 7);
        assert_eq!(analytics.daily_stats[0].date, today);
        assert_eq!(analytics.daily_stats[6].date, jiff::civil::date(2024, 3, 4));
        assert_eq!(analytics.summary.total_patients_week, 0);
        assert_eq!(analytics.summary.high_priority_percentage, 0.0);
    }

    #[test]
    fn counts_records_per_day_and_priority() {
        let today = jiff::civil::date(2024, 3, 10);
        let records = [
            record("2024-03-10T08:00:00Z", "High"),
            record("2024-03-10T09:30:00Z", "low"),
            record("2024-03-08T23:59:59Z", "Medium"),
            record("2024-03-02T12:00:00Z", "High"),
        ];
        let analytics = summarize_week(&records, today);

        let today_stats = &analytics.daily_stats[0];
        assert_eq!(today_stats.total_patients, 2);
        assert_eq!(today_stats.high_priority, 1);
        assert_eq!(today_stats.low_priority, 1);
        assert_eq!(analytics.daily_stats[2].medium_priority, 1);

        // the 2024-03-02 record is outside the window
        assert_eq!(analytics.summary.total_patients_week, 3);
        assert_eq!(analytics.summary.high_priority_percentage, 33.3);
    }
}
