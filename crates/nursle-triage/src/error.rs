use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("missing required field: symptoms")]
    MissingSymptoms,

    #[error("invalid triage tables: {0}")]
    InvalidTables(String),

    #[error("failed to parse triage tables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read triage tables: {0}")]
    Io(#[from] std::io::Error),
}
