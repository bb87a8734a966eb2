//! nursle-triage
//!
//! Rule-based symptom triage. Pure data and computation with no storage or
//! network dependency. Scores free-text symptom descriptions against keyword
//! tables to suggest candidate conditions, and projects recovery outcomes
//! from fixed multiplier tables.
//!
//! The two pipelines deliberately use different classifiers: diagnosis
//! scores every category ([`classifier::score_categories`]) while prediction
//! picks a single condition type by first keyword match
//! ([`classifier::classify_condition_type`]).

pub mod category;
pub mod classifier;
pub mod diagnosis;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod prediction;
pub mod recommendations;
pub mod service;
pub mod tables;

/// Round to a fixed number of decimal places for presentation.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
