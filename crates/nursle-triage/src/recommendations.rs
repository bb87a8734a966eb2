use crate::category::Severity;
use crate::diagnosis::DiagnosisCandidate;

pub const CONSULT_PROFESSIONAL: &str =
    "Please consult with a healthcare professional for proper evaluation.";

pub const BASELINE: [&str; 3] = [
    "Monitor vital signs closely",
    "Ensure patient comfort and positioning",
    "Document all symptoms and their progression",
];

pub const URGENT: [&str; 3] = [
    "Consider immediate medical intervention",
    "Prepare for potential emergency procedures",
    "Notify attending physician immediately",
];

pub const ROUTINE: [&str; 2] = [
    "Schedule follow-up within 24-48 hours",
    "Provide patient education on symptom monitoring",
];

/// Nursing actions for a set of candidate diagnoses.
pub fn recommendations_for(diagnoses: &[DiagnosisCandidate]) -> Vec<String> {
    if diagnoses.is_empty() {
        return vec![CONSULT_PROFESSIONAL.to_string()];
    }

    let escalate = diagnoses.iter().any(|d| d.severity == Severity::High);
    let extra: &[&str] = if escalate { &URGENT } else { &ROUTINE };

    BASELINE
        .iter()
        .chain(extra)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn candidate(severity: Severity) -> DiagnosisCandidate {
        DiagnosisCandidate {
            condition: "Test".to_string(),
            confidence: 0.8,
            severity,
            category: Category::Respiratory,
        }
    }

    #[test]
    fn no_diagnoses_defers_to_professional() {
        assert_eq!(recommendations_for(&[]), vec![CONSULT_PROFESSIONAL.to_string()]);
    }

    #[test]
    fn high_severity_escalates() {
        let recs = recommendations_for(&[candidate(Severity::Low), candidate(Severity::High)]);
        assert_eq!(recs.len(), 6);
        assert_eq!(recs[..3], BASELINE.map(String::from));
        assert_eq!(recs[3..], URGENT.map(String::from));
    }

    #[test]
    fn otherwise_routine_follow_up() {
        let recs = recommendations_for(&[candidate(Severity::Medium)]);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[3..], ROUTINE.map(String::from));
    }
}
