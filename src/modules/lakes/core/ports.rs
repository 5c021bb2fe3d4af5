use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::lakes::core::lake::{DatasetVersion, Lake, LakeLayer, LayerKind};

/// Read side of the lake catalog, plus the inserts the seeding tool needs.
#[async_trait]
pub trait LakeCatalog: Send + Sync {
    async fn list_lakes(&self) -> anyhow::Result<Vec<Lake>>;
    async fn get_lake(&self, lake_id: Uuid) -> anyhow::Result<Option<Lake>>;
    async fn active_dataset(&self, lake_id: Uuid) -> anyhow::Result<Option<DatasetVersion>>;
    /// Only returns the dataset when it belongs to `lake_id`.
    async fn dataset(
        &self,
        lake_id: Uuid,
        dataset_version_id: Uuid,
    ) -> anyhow::Result<Option<DatasetVersion>>;
    async fn layer(
        &self,
        dataset_version_id: Uuid,
        kind: LayerKind,
    ) -> anyhow::Result<Option<LakeLayer>>;

    async fn insert_lake(&self, lake: Lake) -> anyhow::Result<()>;
    async fn insert_dataset(&self, dataset: DatasetVersion) -> anyhow::Result<()>;
    async fn insert_layer(&self, layer: LakeLayer) -> anyhow::Result<()>;
}
