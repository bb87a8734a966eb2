use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Symptom category scored by the keyword classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Category {
    Respiratory,
    Cardiac,
    Neurological,
    Gastrointestinal,
    Infectious,
}

/// Coarse condition bucket used only by the outcome predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConditionType {
    Respiratory,
    Cardiac,
    Neurological,
    Infectious,
    General,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Respiratory => "respiratory",
            Self::Cardiac => "cardiac",
            Self::Neurological => "neurological",
            Self::Infectious => "infectious",
            Self::General => "general",
        }
    }

    /// Condition types whose care plan involves a specialist.
    pub fn needs_specialist(&self) -> bool {
        matches!(self, Self::Cardiac | Self::Neurological)
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Severity {
    Low,
    Medium,
    High,
}
