//! Storage key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of objects in the Nursle bucket.

use uuid::Uuid;

pub const NURSES_PREFIX: &str = "nurses/";
pub const PATIENTS_PREFIX: &str = "patients/";
pub const TRIAGE_PREFIX: &str = "triage/";

pub fn nurse(id: Uuid) -> String {
    format!("nurses/{id}.json")
}

/// Email index entry. `email` must already be normalized.
pub fn nurse_email(email: &str) -> String {
    format!("nurse-emails/{email}.json")
}

pub fn patient(id: Uuid) -> String {
    format!("patients/{id}.json")
}

pub fn medical_history_prefix(patient_id: Uuid) -> String {
    format!("medical-history/{patient_id}/")
}

pub fn medical_history(patient_id: Uuid, id: Uuid) -> String {
    format!("medical-history/{patient_id}/{id}.json")
}

pub fn triage_prefix(patient_id: Uuid) -> String {
    format!("triage/{patient_id}/")
}

pub fn triage_record(patient_id: Uuid, id: Uuid) -> String {
    format!("triage/{patient_id}/{id}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keys_live_under_patient_prefix() {
        let patient = Uuid::new_v4();
        let entry = Uuid::new_v4();
        assert!(medical_history(patient, entry).starts_with(&medical_history_prefix(patient)));
        assert!(triage_record(patient, entry).starts_with(&triage_prefix(patient)));
        assert!(triage_prefix(patient).starts_with(TRIAGE_PREFIX));
    }
}
