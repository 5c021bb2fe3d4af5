use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::get_object::GetObjectError;

use crate::shared::infrastructure::object_store::{ObjectStore, ObjectStoreError, parse_s3_uri};

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// S3 compatible store. Path-style addressing keeps MinIO endpoints working.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub async fn connect(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "lake_maps",
        );
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint.clone())
            .credentials_provider(credentials)
            .load()
            .await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();
        Self {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, uri: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let (bucket, key) = parse_s3_uri(uri)?;
        let response = self
            .client
            .get_object()
            .bucket(&bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                GetObjectError::NoSuchKey(_) => ObjectStoreError::NotFound(uri.to_string()),
                other => ObjectStoreError::Backend(other.to_string()),
            })?;
        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::Backend(format!("failed to read object body: {e}")))?
            .into_bytes();
        tracing::debug!(%bucket, %key, size = bytes.len(), "downloaded object");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod s3_object_store_integration_tests {
    use super::*;

    // Requires the Compose stack (MinIO on localhost:9000) and a seeded object.
    #[tokio::test]
    #[ignore = "integration"]
    async fn integration_it_should_read_a_seeded_layer() {
        let store = S3ObjectStore::connect(&S3Settings {
            endpoint: "http://localhost:9000".into(),
            access_key: "minioadmin".into(),
            secret_key: "minioadmin".into(),
            region: "us-east-1".into(),
        })
        .await;
        let bytes = store
            .get("s3://maps/lakes/san_roque_demo/v1/water.tif")
            .await
            .unwrap();
        assert!(!bytes.is_empty());
    }
}
