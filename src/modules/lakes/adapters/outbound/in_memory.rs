use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::lakes::core::lake::{DatasetStatus, DatasetVersion, Lake, LakeLayer, LayerKind};
use crate::modules::lakes::core::ports::LakeCatalog;

#[derive(Default)]
pub struct InMemoryLakeCatalog {
    lakes: RwLock<HashMap<Uuid, Lake>>,
    datasets: RwLock<Vec<DatasetVersion>>,
    layers: RwLock<Vec<LakeLayer>>,
    offline: AtomicBool,
}

impl InMemoryLakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> anyhow::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("Catalog offline");
        }
        Ok(())
    }
}

#[async_trait]
impl LakeCatalog for InMemoryLakeCatalog {
    async fn list_lakes(&self) -> anyhow::Result<Vec<Lake>> {
        self.check_online()?;
        Ok(self.lakes.read().await.values().cloned().collect())
    }

    async fn get_lake(&self, lake_id: Uuid) -> anyhow::Result<Option<Lake>> {
        self.check_online()?;
        Ok(self.lakes.read().await.get(&lake_id).cloned())
    }

    async fn active_dataset(&self, lake_id: Uuid) -> anyhow::Result<Option<DatasetVersion>> {
        self.check_online()?;
        Ok(self
            .datasets
            .read()
            .await
            .iter()
            .filter(|d| d.lake_id == lake_id && d.status == DatasetStatus::Active)
            .max_by_key(|d| d.version)
            .cloned())
    }

    async fn dataset(
        &self,
        lake_id: Uuid,
        dataset_version_id: Uuid,
    ) -> anyhow::Result<Option<DatasetVersion>> {
        self.check_online()?;
        Ok(self
            .datasets
            .read()
            .await
            .iter()
            .find(|d| d.id == dataset_version_id && d.lake_id == lake_id)
            .cloned())
    }

    async fn layer(
        &self,
        dataset_version_id: Uuid,
        kind: LayerKind,
    ) -> anyhow::Result<Option<LakeLayer>> {
        self.check_online()?;
        Ok(self
            .layers
            .read()
            .await
            .iter()
            .find(|l| l.dataset_version_id == dataset_version_id && l.layer_kind == kind)
            .cloned())
    }

    async fn insert_lake(&self, lake: Lake) -> anyhow::Result<()> {
        self.check_online()?;
        self.lakes.write().await.insert(lake.id, lake);
        Ok(())
    }

    async fn insert_dataset(&self, dataset: DatasetVersion) -> anyhow::Result<()> {
        self.check_online()?;
        self.datasets.write().await.push(dataset);
        Ok(())
    }

    async fn insert_layer(&self, layer: LakeLayer) -> anyhow::Result<()> {
        self.check_online()?;
        let mut layers = self.layers.write().await;
        layers.retain(|l| {
            !(l.dataset_version_id == layer.dataset_version_id && l.layer_kind == layer.layer_kind)
        });
        layers.push(layer);
        Ok(())
    }
}
