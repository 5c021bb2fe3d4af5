// Object storage port for raster layers.
//
// Layers are addressed by `s3://bucket/key` URIs stored in the catalog.
// Adapters return the whole object in memory.

use async_trait::async_trait;
use thiserror::Error;

pub mod in_memory;
pub mod s3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectStoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid storage uri: {0}")]
    InvalidUri(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, uri: &str) -> Result<Vec<u8>, ObjectStoreError>;
}

/// Splits `s3://bucket/key` into `(bucket, key)`.
pub fn parse_s3_uri(uri: &str) -> Result<(String, String), ObjectStoreError> {
    let rest = uri
        .strip_prefix("s3://")
        .ok_or_else(|| ObjectStoreError::InvalidUri(uri.to_string()))?;
    let (bucket, key) = rest
        .split_once('/')
        .ok_or_else(|| ObjectStoreError::InvalidUri(uri.to_string()))?;
    if bucket.is_empty() || key.is_empty() {
        return Err(ObjectStoreError::InvalidUri(uri.to_string()));
    }
    Ok((bucket.to_string(), key.to_string()))
}
