pub mod medical_history;
pub mod nurse;
pub mod patient;
pub mod priority;
pub mod triage_record;
