use std::env;
use std::path::PathBuf;

use eyre::{bail, WrapErr};

use nursle_triage::diagnosis::DEFAULT_CONFIDENCE_THRESHOLD;
use nursle_triage::service::AiConfig;

/// Secret used when running against the in-memory store without `SECRET_KEY`.
const DEV_SECRET: &str = "nursle-dev-secret-do-not-deploy";
const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Memory,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub storage: StorageBackend,
    pub bucket: String,
    pub secret_key: String,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub ai: AiConfig,
    /// JSON file replacing the built-in triage tables.
    pub triage_tables: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage = match var("NURSLE_STORAGE").as_deref() {
            None | Some("memory") => StorageBackend::Memory,
            Some("s3") => StorageBackend::S3,
            Some(other) => bail!("NURSLE_STORAGE must be 's3' or 'memory', got '{other}'"),
        };

        let secret_key = match (var("SECRET_KEY"), storage) {
            (Some(secret), _) => secret,
            (None, StorageBackend::Memory) => {
                tracing::warn!("SECRET_KEY not set, using the development secret");
                DEV_SECRET.to_string()
            }
            (None, StorageBackend::S3) => bail!("SECRET_KEY is required when NURSLE_STORAGE=s3"),
        };

        let session_ttl_secs = match var("SESSION_TTL_SECS") {
            Some(v) => v.parse().wrap_err("SESSION_TTL_SECS must be a whole number of seconds")?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let port = match var("PORT") {
            Some(v) => v.parse().wrap_err("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let confidence_threshold = match var("AI_CONFIDENCE_THRESHOLD") {
            Some(v) => v.parse().wrap_err("AI_CONFIDENCE_THRESHOLD must be a number")?,
            None => DEFAULT_CONFIDENCE_THRESHOLD,
        };
        if !(0.0..=1.0).contains(&confidence_threshold) {
            bail!("AI_CONFIDENCE_THRESHOLD must be between 0 and 1, got {confidence_threshold}");
        }

        Ok(Self {
            storage,
            bucket: var("NURSLE_BUCKET").unwrap_or_else(|| "nursle".to_string()),
            secret_key,
            session_ttl_secs,
            port,
            ai: AiConfig {
                enabled: flag(var("AI_ENABLED"), true),
                log_predictions: flag(var("AI_LOG_PREDICTIONS"), true),
                confidence_threshold,
            },
            triage_tables: var("NURSLE_TRIAGE_TABLES").map(PathBuf::from),
        })
    }
}

/// Only a literal `true` (any case) turns a flag on.
fn flag(value: Option<String>, default: bool) -> bool {
    value.map_or(default, |v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_memory_storage() {
        let config = config(&[]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.bucket, "nursle");
        assert_eq!(config.port, 8000);
        assert_eq!(config.session_ttl_secs, 43200);
        assert_eq!(config.secret_key, DEV_SECRET);
        assert_eq!(config.ai, AiConfig::default());
        assert!(config.triage_tables.is_none());
    }

    #[test]
    fn s3_requires_secret() {
        assert!(config(&[("NURSLE_STORAGE", "s3")]).is_err());
        let config = config(&[("NURSLE_STORAGE", "s3"), ("SECRET_KEY", "k")]).unwrap();
        assert_eq!(config.storage, StorageBackend::S3);
    }

    #[test]
    fn ai_flags_follow_env() {
        let config = config(&[
            ("AI_ENABLED", "False"),
            ("AI_LOG_PREDICTIONS", "TRUE"),
            ("AI_CONFIDENCE_THRESHOLD", "0.5"),
        ])
        .unwrap();
        assert!(!config.ai.enabled);
        assert!(config.ai.log_predictions);
        assert_eq!(config.ai.confidence_threshold, 0.5);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("AI_CONFIDENCE_THRESHOLD", "1.5")]).is_err());
        assert!(config(&[("NURSLE_STORAGE", "dynamo")]).is_err());
    }
}
