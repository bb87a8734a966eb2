use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::{Category, Severity};
use crate::classifier::CategoryScore;
use crate::round_to;
use crate::tables::ConditionTemplate;

/// No candidate is ever reported above this confidence.
pub const CONFIDENCE_CAP: f64 = 0.98;

/// A category must score strictly above this to contribute candidates.
pub const CATEGORY_SCORE_FLOOR: f64 = 0.3;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

pub const MAX_DIAGNOSES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisCandidate {
    pub condition: String,
    /// In [0, 0.98], rounded to three decimals.
    pub confidence: f64,
    pub severity: Severity,
    pub category: Category,
}

/// Patients at the extremes of age are weighted towards higher confidence.
pub fn age_factor(age: i64) -> f64 {
    if age > 65 || age < 5 {
        1.1
    } else if age > 50 {
        1.05
    } else {
        1.0
    }
}

/// Reserved for condition-specific adjustment; currently neutral.
pub fn gender_factor(_gender: &str) -> f64 {
    1.0
}

pub fn calculate_confidence(base_confidence: f64, category_score: f64, age: i64, gender: &str) -> f64 {
    let confidence = base_confidence * category_score * age_factor(age) * gender_factor(gender);
    confidence.clamp(0.0, CONFIDENCE_CAP)
}

/// Expand category scores into ranked candidate conditions.
///
/// Only categories scoring above [`CATEGORY_SCORE_FLOOR`] with a condition
/// table contribute. Candidates below `threshold` are dropped; the rest are
/// sorted by descending confidence (ties keep table order) and truncated to
/// [`MAX_DIAGNOSES`].
pub fn generate_diagnoses(
    scores: &[CategoryScore],
    conditions: &BTreeMap<Category, Vec<ConditionTemplate>>,
    age: i64,
    gender: &str,
    threshold: f64,
) -> Vec<DiagnosisCandidate> {
    let mut diagnoses: Vec<DiagnosisCandidate> = scores
        .iter()
        .filter(|s| s.score > CATEGORY_SCORE_FLOOR)
        .filter_map(|s| conditions.get(&s.category).map(|table| (s, table)))
        .flat_map(|(s, table)| {
            table.iter().filter_map(move |c| {
                let confidence = calculate_confidence(c.base_confidence, s.score, age, gender);
                (confidence >= threshold).then(|| DiagnosisCandidate {
                    condition: c.name.clone(),
                    confidence: round_to(confidence, 3),
                    severity: c.severity,
                    category: s.category,
                })
            })
        })
        .collect();

    diagnoses.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    diagnoses.truncate(MAX_DIAGNOSES);
    diagnoses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::score_categories;
    use crate::tables::DiagnosticTables;

    fn diagnose(text: &str, age: i64, threshold: f64) -> Vec<DiagnosisCandidate> {
        let tables = DiagnosticTables::default();
        let scores = score_categories(text, &tables.symptom_keywords);
        generate_diagnoses(&scores, &tables.conditions, age, "Unknown", threshold)
    }

    #[test]
    fn age_factor_brackets() {
        assert_eq!(age_factor(4), 1.1);
        assert_eq!(age_factor(5), 1.0);
        assert_eq!(age_factor(50), 1.0);
        assert_eq!(age_factor(51), 1.05);
        assert_eq!(age_factor(65), 1.05);
        assert_eq!(age_factor(66), 1.1);
    }

    #[test]
    fn confidence_is_capped() {
        assert_eq!(calculate_confidence(1.0, 1.0, 80, "Female"), CONFIDENCE_CAP);
    }

    #[test]
    fn confidence_is_never_negative() {
        assert_eq!(calculate_confidence(-0.5, 1.0, 30, "Male"), 0.0);
    }

    #[test]
    fn elderly_patient_crosses_threshold_younger_does_not() {
        let text = "chest pain, palpitations and heart racing";

        let elderly = diagnose(text, 70, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(elderly.len(), 1);
        assert_eq!(elderly[0].condition, "Chest Pain Syndrome");
        assert_eq!(elderly[0].severity, Severity::High);
        assert_eq!(elderly[0].category, Category::Cardiac);
        assert_eq!(elderly[0].confidence, 0.701);

        assert!(diagnose(text, 30, DEFAULT_CONFIDENCE_THRESHOLD).is_empty());
    }

    #[test]
    fn low_scoring_categories_contribute_nothing() {
        // cardiac scores 0.25, respiratory 0.4 but no candidate reaches 0.7
        assert!(diagnose("severe chest pain and shortness of breath", 70, 0.0)
            .iter()
            .all(|d| d.category == Category::Respiratory));
    }

    #[test]
    fn results_are_sorted_and_truncated() {
        let text = "cough, shortness of breath, wheezing, dyspnea, chest pain, palpitations, \
                    heart racing, irregular heartbeat, headache, dizziness, confusion";
        let diagnoses = diagnose(text, 70, 0.0);
        assert_eq!(diagnoses.len(), MAX_DIAGNOSES);
        assert!(diagnoses.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert!(diagnoses.iter().all(|d| (0.0..=CONFIDENCE_CAP).contains(&d.confidence)));
        assert_eq!(diagnoses[0].condition, "Chest Pain Syndrome");
        assert_eq!(diagnoses[0].confidence, 0.935);
    }

    #[test]
    fn categories_without_conditions_are_skipped() {
        assert!(diagnose("nausea, vomiting, diarrhea and abdominal pain", 30, 0.0).is_empty());
    }
}
