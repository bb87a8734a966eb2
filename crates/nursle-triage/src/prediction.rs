//! Outcome projections for a classified condition type.
//!
//! Every figure is a fixed-table lookup followed by simple multipliers; none
//! of it is a calibrated statistical estimate.

use nursle_core::models::priority::Priority;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::ConditionType;
use crate::round_to;
use crate::tables::RecoveryModel;

/// Complications probability never exceeds this.
pub const RISK_CAP: f64 = 0.8;

pub const BED_DAY_COST: i64 = 500;
pub const FOLLOW_UP_COST: i64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecoveryEstimate {
    pub estimated_days: i64,
    /// `0.85 - variance * 0.05`; not clamped, so very wide models go negative.
    pub confidence: f64,
    pub range_min: i64,
    pub range_max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.4 {
            Self::High
        } else if probability > 0.2 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComplicationsRisk {
    pub risk_level: RiskLevel,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResourceNeeds {
    pub bed_days: i64,
    pub specialist_required: bool,
    pub follow_up_visits: i64,
    pub estimated_cost: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OutcomeProbabilities {
    pub full_recovery: f64,
    pub partial_recovery: f64,
    pub chronic_condition: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.full_recovery + self.partial_recovery + self.chronic_condition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionBundle {
    pub recovery_time: RecoveryEstimate,
    pub complications_risk: ComplicationsRisk,
    pub resource_needs: ResourceNeeds,
    pub outcome_prediction: OutcomeProbabilities,
    pub condition_type: ConditionType,
}

pub fn age_multiplier(age: i64) -> f64 {
    if age > 65 {
        1.3
    } else if age < 18 {
        0.8
    } else {
        1.0
    }
}

/// Unrecognised or missing priorities are neutral.
pub fn priority_multiplier(priority: Option<Priority>) -> f64 {
    match priority {
        Some(Priority::High) => 1.2,
        Some(Priority::Medium) | None => 1.0,
        Some(Priority::Low) => 0.9,
    }
}

pub fn age_risk_multiplier(age: i64) -> f64 {
    if age > 70 {
        2.0
    } else if age > 60 {
        1.5
    } else if age < 18 {
        1.2
    } else {
        1.0
    }
}

pub fn predict_recovery_time(model: &RecoveryModel, age: i64, priority: Option<Priority>) -> RecoveryEstimate {
    let scaled = f64::from(model.base_days) * age_multiplier(age) * priority_multiplier(priority);
    let estimated_days = scaled as i64;
    let variance = i64::from(model.variance);

    RecoveryEstimate {
        estimated_days,
        confidence: round_to(0.85 - f64::from(model.variance) * 0.05, 2),
        range_min: estimated_days - variance,
        range_max: estimated_days + variance,
    }
}

pub fn assess_complications_risk(model: &RecoveryModel, age: i64) -> ComplicationsRisk {
    let probability = (model.complications_risk * age_risk_multiplier(age)).min(RISK_CAP);
    ComplicationsRisk {
        risk_level: RiskLevel::from_probability(probability),
        probability: round_to(probability, 3),
    }
}

/// Resource estimate derived from the projected stay alone.
pub fn predict_resource_requirements(condition_type: ConditionType, estimated_days: i64) -> ResourceNeeds {
    let bed_days = (estimated_days / 3).max(1);
    let follow_up_visits = (estimated_days / 7).clamp(1, 4);

    ResourceNeeds {
        bed_days,
        specialist_required: condition_type.needs_specialist(),
        follow_up_visits,
        estimated_cost: bed_days * BED_DAY_COST + follow_up_visits * FOLLOW_UP_COST,
    }
}

/// Age-adjusted outcome probabilities, normalized to sum to 1.
///
/// Each share is rounded to three decimals and the rounding residual is
/// absorbed by the largest share, so no share goes negative.
pub fn calculate_outcome_probabilities(model: &RecoveryModel, age: i64) -> OutcomeProbabilities {
    let mut full = model.outcomes.full;
    let partial = model.outcomes.partial;
    let mut chronic = model.outcomes.chronic;

    if age > 65 {
        full *= 0.9;
        chronic *= 1.5;
    }

    let total = full + partial + chronic;
    let mut shares = [
        round_to(full / total, 3),
        round_to(partial / total, 3),
        round_to(chronic / total, 3),
    ];

    let residual = 1.0 - shares.iter().sum::<f64>();
    let largest = (0..shares.len())
        .max_by(|&a, &b| shares[a].total_cmp(&shares[b]))
        .unwrap_or(0);
    shares[largest] = round_to(shares[largest] + residual, 3);

    OutcomeProbabilities {
        full_recovery: shares[0],
        partial_recovery: shares[1],
        chronic_condition: shares[2],
    }
}
