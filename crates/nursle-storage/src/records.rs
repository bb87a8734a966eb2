//! Typed access to stored records.
//!
//! Every record is a JSON object under the key given by `nursle_core::keys`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nursle_core::keys;
use nursle_core::models::medical_history::MedicalHistory;
use nursle_core::models::nurse::{normalize_email, Nurse};
use nursle_core::models::patient::Patient;
use nursle_core::models::triage_record::TriageRecord;

use crate::error::StorageError;
use crate::store::ObjectStore;

/// Load a JSON object and deserialize it.
pub async fn load_json<T: DeserializeOwned>(store: &ObjectStore, key: &str) -> Result<T, StorageError> {
    let body = store.get(key).await?;
    Ok(serde_json::from_slice(&body)?)
}

pub async fn save_json<T: Serialize>(store: &ObjectStore, key: &str, value: &T) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put(key, body).await
}

/// Load every JSON object under `prefix`, in key order.
pub async fn load_all<T: DeserializeOwned>(store: &ObjectStore, prefix: &str) -> Result<Vec<T>, StorageError> {
    let keys = store.list(prefix).await?;
    let mut values = Vec::with_capacity(keys.len());
    for key in keys.iter().filter(|k| k.ends_with(".json")) {
        values.push(load_json(store, key).await?);
    }
    Ok(values)
}

#[derive(Serialize, Deserialize)]
struct EmailIndexEntry {
    nurse_id: Uuid,
}

/// Store a new nurse, claiming the email first so two concurrent sign-ups
/// with the same address cannot both succeed.
pub async fn create_nurse(store: &ObjectStore, nurse: &Nurse) -> Result<(), StorageError> {
    let email_key = keys::nurse_email(&normalize_email(&nurse.email));
    let entry = serde_json::to_vec(&EmailIndexEntry { nurse_id: nurse.id })?;
    store.put_if_absent(&email_key, entry).await?;

    if let Err(e) = save_json(store, &keys::nurse(nurse.id), nurse).await {
        // release the email claim; the nurse record was never written
        if let Err(cleanup) = store.delete(&email_key).await {
            tracing::warn!(error = %cleanup, key = %email_key, "failed to release email index entry");
        }
        return Err(e);
    }
    Ok(())
}

pub async fn get_nurse(store: &ObjectStore, id: Uuid) -> Result<Nurse, StorageError> {
    load_json(store, &keys::nurse(id)).await
}

pub async fn find_nurse_by_email(store: &ObjectStore, email: &str) -> Result<Option<Nurse>, StorageError> {
    let entry: EmailIndexEntry = match load_json(store, &keys::nurse_email(&normalize_email(email))).await {
        Ok(entry) => entry,
        Err(StorageError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    match get_nurse(store, entry.nurse_id).await {
        Ok(nurse) => Ok(Some(nurse)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn put_patient(store: &ObjectStore, patient: &Patient) -> Result<(), StorageError> {
    save_json(store, &keys::patient(patient.id), patient).await
}

pub async fn get_patient(store: &ObjectStore, id: Uuid) -> Result<Patient, StorageError> {
    load_json(store, &keys::patient(id)).await
}

/// All patients, oldest registration first.
pub async fn list_patients(store: &ObjectStore) -> Result<Vec<Patient>, StorageError> {
    let mut patients: Vec<Patient> = load_all(store, keys::PATIENTS_PREFIX).await?;
    patients.sort_by_key(|p| p.created_at);
    Ok(patients)
}

pub async fn put_medical_history(store: &ObjectStore, entry: &MedicalHistory) -> Result<(), StorageError> {
    save_json(store, &keys::medical_history(entry.patient_id, entry.id), entry).await
}

/// A patient's history, most recent diagnosis first.
pub async fn list_medical_history(store: &ObjectStore, patient_id: Uuid) -> Result<Vec<MedicalHistory>, StorageError> {
    let mut entries: Vec<MedicalHistory> = load_all(store, &keys::medical_history_prefix(patient_id)).await?;
    entries.sort_by(|a, b| b.diagnosis_date.cmp(&a.diagnosis_date));
    Ok(entries)
}

pub async fn put_triage_record(store: &ObjectStore, record: &TriageRecord) -> Result<(), StorageError> {
    save_json(store, &keys::triage_record(record.patient_id, record.id), record).await
}

/// A patient's triage records, newest first.
pub async fn list_triage_records(store: &ObjectStore, patient_id: Uuid) -> Result<Vec<TriageRecord>, StorageError> {
    let mut records: Vec<TriageRecord> = load_all(store, &keys::triage_prefix(patient_id)).await?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// Every triage record across all patients, in no particular order.
pub async fn list_all_triage_records(store: &ObjectStore) -> Result<Vec<TriageRecord>, StorageError> {
    load_all(store, keys::TRIAGE_PREFIX).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nurse(email: &str) -> Nurse {
        Nurse {
            id: Uuid::new_v4(),
            full_name: "Mary Seacole".to_string(),
            email: email.to_string(),
            staff_number: "RN-0042".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            created_at: jiff::Timestamp::now(),
        }
    }

    fn history(patient_id: Uuid, date: &str) -> MedicalHistory {
        MedicalHistory {
            id: Uuid::new_v4(),
            patient_id,
            condition: "Asthma".to_string(),
            diagnosis_date: date.parse().unwrap(),
            treatment: String::new(),
            status: "Active".to_string(),
            created_at: jiff::Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn nurse_is_found_by_email_ignoring_case() {
        let store = ObjectStore::memory();
        let created = nurse("Mary@Ward.org");
        create_nurse(&store, &created).await.unwrap();

        let found = find_nurse_by_email(&store, " mary@WARD.org").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(find_nurse_by_email(&store, "nobody@ward.org").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = ObjectStore::memory();
        create_nurse(&store, &nurse("mary@ward.org")).await.unwrap();
        assert!(matches!(
            create_nurse(&store, &nurse("MARY@ward.org")).await,
            Err(StorageError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn history_is_scoped_to_patient_and_newest_first() {
        let store = ObjectStore::memory();
        let patient = Uuid::new_v4();
        let other = Uuid::new_v4();
        put_medical_history(&store, &history(patient, "2021-05-01T00:00:00Z")).await.unwrap();
        put_medical_history(&store, &history(patient, "2023-01-10T00:00:00Z")).await.unwrap();
        put_medical_history(&store, &history(other, "2022-01-01T00:00:00Z")).await.unwrap();

        let entries = list_medical_history(&store, patient).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].diagnosis_date > entries[1].diagnosis_date);
    }

    #[tokio::test]
    async fn missing_patient_is_not_found() {
        let store = ObjectStore::memory();
        assert!(matches!(
            get_patient(&store, Uuid::new_v4()).await,
            Err(StorageError::NotFound { .. })
        ));
    }
}
