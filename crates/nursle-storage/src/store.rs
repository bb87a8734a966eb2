use std::collections::BTreeMap;
use std::sync::Arc;

use aws_sdk_s3::Client;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::objects;

const JSON: &str = "application/json";

/// Key/value object storage backing all records.
///
/// `S3` is the deployed backend. `Memory` keeps objects in process and is
/// used for local development and tests; clones share the same map.
#[derive(Clone)]
pub enum ObjectStore {
    S3 { client: Client, bucket: String },
    Memory(Arc<RwLock<BTreeMap<String, Vec<u8>>>>),
}

impl ObjectStore {
    pub fn s3(client: Client, bucket: impl Into<String>) -> Self {
        Self::S3 {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn memory() -> Self {
        Self::Memory(Arc::default())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::Memory(_) => "memory",
        }
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::S3 { client, bucket } => objects::get_object(client, bucket, key).await,
            Self::Memory(map) => map
                .read()
                .await
                .get(key)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    key: key.to_string(),
                }),
        }
    }

    pub async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        match self {
            Self::S3 { client, bucket } => {
                objects::put_object(client, bucket, key, body, Some(JSON)).await
            }
            Self::Memory(map) => {
                map.write().await.insert(key.to_string(), body);
                Ok(())
            }
        }
    }

    /// Create `key` only if it does not exist yet.
    pub async fn put_if_absent(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        match self {
            Self::S3 { client, bucket } => {
                objects::put_object_if_absent(client, bucket, key, body, Some(JSON)).await
            }
            Self::Memory(map) => {
                let mut map = map.write().await;
                if map.contains_key(key) {
                    return Err(StorageError::AlreadyExists {
                        key: key.to_string(),
                    });
                }
                map.insert(key.to_string(), body);
                Ok(())
            }
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::S3 { client, bucket } => objects::delete_object(client, bucket, key).await,
            Self::Memory(map) => {
                map.write().await.remove(key);
                Ok(())
            }
        }
    }

    /// Keys under `prefix`, in lexicographic order.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        match self {
            Self::S3 { client, bucket } => objects::list_objects(client, bucket, prefix).await,
            Self::Memory(map) => Ok(map
                .read()
                .await
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect()),
        }
    }

    /// Confirm the backend is reachable.
    pub async fn ping(&self) -> Result<(), StorageError> {
        match self {
            Self::S3 { client, bucket } => objects::head_bucket(client, bucket).await,
            Self::Memory(_) => Ok(()),
        }
    }
}
