pub mod ai;
pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod medical_history;
pub mod patients;
pub mod symptoms;
pub mod triage;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

/// Accept an age sent as a number or a numeric string; anything else is
/// treated as absent.
pub fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(age_from_value))
}

fn age_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reject a blank symptom description before it reaches the pipeline.
pub fn require_symptoms(symptoms: &str) -> Result<&str, ApiError> {
    if symptoms.trim().is_empty() {
        return Err(ApiError::BadRequest("Symptoms description is required".to_string()));
    }
    Ok(symptoms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct WithAge {
        #[serde(default, deserialize_with = "lenient_age")]
        age: Option<i64>,
    }

    fn age(json: &str) -> Option<i64> {
        serde_json::from_str::<WithAge>(json).unwrap().age
    }

    #[test]
    fn age_coercion() {
        assert_eq!(age(r#"{"age": 42}"#), Some(42));
        assert_eq!(age(r#"{"age": "67"}"#), Some(67));
        assert_eq!(age(r#"{"age": 7.9}"#), Some(7));
        assert_eq!(age(r#"{"age": "seventy"}"#), None);
        assert_eq!(age(r#"{"age": null}"#), None);
        assert_eq!(age(r#"{"age": [1]}"#), None);
        assert_eq!(age("{}"), None);
    }
}
