use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::shared::infrastructure::object_store::{ObjectStore, ObjectStoreError, parse_s3_uri};

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.objects.write().await.insert(uri.into(), bytes);
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, uri: &str) -> Result<Vec<u8>, ObjectStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Backend("Object store offline".into()));
        }
        parse_s3_uri(uri)?;
        self.objects
            .read()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound(uri.to_string()))
    }
}
