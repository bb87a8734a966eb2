use uuid::Uuid;

use nursle_auth::password::hash_password;
use nursle_core::models::nurse::Nurse;
use nursle_storage::error::StorageError;
use nursle_storage::records;
use nursle_storage::store::ObjectStore;

/// Development sign-ins created in memory mode: (email, password, staff number).
pub const DEV_NURSES: [(&str, &str, &str); 2] = [
    ("nurse@example.com", "NURSE123", "NURSE123"),
    ("test@example.com", "N123", "N123"),
];

/// Create the development nurse accounts, skipping any that already exist.
pub async fn seed_dev_nurses(store: &ObjectStore) -> eyre::Result<()> {
    for (email, password, staff_number) in DEV_NURSES {
        let password_hash = tokio::task::spawn_blocking(move || hash_password(password)).await??;
        let nurse = Nurse {
            id: Uuid::new_v4(),
            full_name: "Test Nurse".to_string(),
            email: email.to_string(),
            staff_number: staff_number.to_string(),
            password_hash,
            created_at: jiff::Timestamp::now(),
        };

        match records::create_nurse(store, &nurse).await {
            Ok(()) => tracing::info!(email, "seeded development nurse"),
            Err(StorageError::AlreadyExists { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
