//! Keyword classifiers.
//!
//! Both classifiers use plain case-insensitive substring containment: no
//! tokenisation, stemming or negation handling. "no chest pain" matches
//! "chest pain".

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::{Category, ConditionType};
use crate::tables::{ConditionRule, KeywordGroup};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryScore {
    pub category: Category,
    /// Fraction of the category's keywords found in the text, in (0, 1].
    pub score: f64,
}

/// Score each category by the fraction of its keywords present in `text`.
///
/// Categories with no matching keyword are omitted, so an empty text yields
/// an empty result. Output follows the order of `groups`.
pub fn score_categories(text: &str, groups: &[KeywordGroup]) -> Vec<CategoryScore> {
    let text = text.to_lowercase();
    if text.is_empty() {
        return Vec::new();
    }

    groups
        .iter()
        .filter(|g| !g.keywords.is_empty())
        .filter_map(|g| {
            let matched = g
                .keywords
                .iter()
                .filter(|k| text.contains(k.to_lowercase().as_str()))
                .count();
            (matched > 0).then(|| CategoryScore {
                category: g.category,
                score: (matched as f64 / g.keywords.len() as f64).min(1.0),
            })
        })
        .collect()
}

/// Pick a single condition type: the first rule with any keyword present in
/// `text` wins, otherwise [`ConditionType::General`].
pub fn classify_condition_type(text: &str, rules: &[ConditionRule]) -> ConditionType {
    let text = text.to_lowercase();
    rules
        .iter()
        .find(|r| r.keywords.iter().any(|k| text.contains(k.to_lowercase().as_str())))
        .map(|r| r.condition_type)
        .unwrap_or(ConditionType::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{DiagnosticTables, PredictiveTables};

    fn score(text: &str) -> Vec<CategoryScore> {
        score_categories(text, &DiagnosticTables::default().symptom_keywords)
    }

    fn score_of(scores: &[CategoryScore], category: Category) -> Option<f64> {
        scores.iter().find(|s| s.category == category).map(|s| s.score)
    }

    #[test]
    fn empty_text_scores_nothing() {
        assert!(score("").is_empty());
    }

    #[test]
    fn unmatched_text_scores_nothing() {
        assert!(score("patient reports a sprained ankle").is_empty());
    }

    #[test]
    fn score_is_fraction_of_keywords_matched() {
        let scores = score("Severe chest pain and shortness of breath");
        assert_eq!(score_of(&scores, Category::Respiratory), Some(2.0 / 5.0));
        assert_eq!(score_of(&scores, Category::Cardiac), Some(1.0 / 4.0));
        assert_eq!(score_of(&scores, Category::Neurological), None);
    }

    #[test]
    fn matching_ignores_case() {
        let scores = score("NAUSEA, Vomiting");
        assert_eq!(score_of(&scores, Category::Gastrointestinal), Some(0.5));
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let scores = score("cough cough cough");
        assert_eq!(score_of(&scores, Category::Respiratory), Some(0.2));
    }

    #[test]
    fn output_follows_table_order() {
        let scores = score("fever and cough");
        let order: Vec<_> = scores.iter().map(|s| s.category).collect();
        assert_eq!(order, vec![Category::Respiratory, Category::Infectious]);
    }

    #[test]
    fn negation_is_not_understood() {
        assert!(!score("denies any headache").is_empty());
    }

    #[test]
    fn condition_type_uses_first_matching_rule() {
        let rules = PredictiveTables::default().classification_rules;
        assert_eq!(classify_condition_type("cough and fever", &rules), ConditionType::Respiratory);
        assert_eq!(
            classify_condition_type("Chest pain with cough", &rules),
            ConditionType::Cardiac
        );
        assert_eq!(classify_condition_type("chills", &rules), ConditionType::Infectious);
        assert_eq!(classify_condition_type("sprained ankle", &rules), ConditionType::General);
        assert_eq!(classify_condition_type("", &rules), ConditionType::General);
    }
}
