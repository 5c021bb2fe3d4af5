use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::lake::{DatasetVersion, Lake, LakeLayer, LayerKind};
use crate::modules::lakes::core::ports::LakeCatalog;
use crate::modules::lakes::core::raster::{Raster, decode_geotiff};
use crate::modules::lakes::core::selection::ConstraintMasks;
use crate::modules::lakes::core::views::LayerStatsResponse;
use crate::modules::lakes::errors::LakesError;
use crate::shared::infrastructure::object_store::ObjectStore;

const STATS_TTL: Duration = Duration::from_secs(30 * 60);
const STATS_CAPACITY: u64 = 256;
const CONSTRAINTS_TTL: Duration = Duration::from_secs(10 * 60);
const CONSTRAINTS_CAPACITY: u64 = 128;

/// Lake catalog reads and raster-backed computations. Each use case adds
/// its own `impl` block.
pub struct LakesService {
    pub(crate) catalog: Arc<dyn LakeCatalog>,
    pub(crate) store: Arc<dyn ObjectStore>,
    pub(crate) stats_cache: Cache<(Uuid, Uuid, LayerKind), LayerStatsResponse>,
    pub(crate) constraints_cache: Cache<(Uuid, Uuid), Arc<ConstraintMasks>>,
}

impl LakesService {
    pub fn new(catalog: Arc<dyn LakeCatalog>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            catalog,
            store,
            stats_cache: Cache::builder()
                .max_capacity(STATS_CAPACITY)
                .time_to_live(STATS_TTL)
                .build(),
            constraints_cache: Cache::builder()
                .max_capacity(CONSTRAINTS_CAPACITY)
                .time_to_live(CONSTRAINTS_TTL)
                .build(),
        }
    }

    pub(crate) async fn lake(&self, lake_id: Uuid) -> Result<Lake, LakesError> {
        self.catalog
            .get_lake(lake_id)
            .await?
            .ok_or(LakesError::LakeNotFound(lake_id))
    }

    /// Without an explicit id the ACTIVE version is used; an explicit id must
    /// belong to the lake.
    pub async fn resolve_dataset_version(
        &self,
        lake_id: Uuid,
        dataset_version_id: Option<Uuid>,
    ) -> Result<DatasetVersion, LakesError> {
        let dataset = match dataset_version_id {
            Some(id) => self.catalog.dataset(lake_id, id).await?,
            None => self.catalog.active_dataset(lake_id).await?,
        };
        dataset.ok_or(LakesError::DatasetNotFound {
            lake_id,
            dataset_version_id,
        })
    }

    pub(crate) async fn layer(
        &self,
        lake_id: Uuid,
        dataset_version_id: Uuid,
        kind: LayerKind,
    ) -> Result<LakeLayer, LakesError> {
        self.catalog
            .layer(dataset_version_id, kind)
            .await?
            .ok_or_else(|| LakesError::LayerNotFound {
                lake_id,
                dataset_version_id,
                layer_kind: kind.as_api().to_string(),
            })
    }

    /// Downloads and decodes a layer, checking it matches the lake grid.
    pub(crate) async fn load_raster(
        &self,
        layer: &LakeLayer,
        grid: &GridSpec,
    ) -> Result<Raster, LakesError> {
        let bytes = self.store.get(&layer.storage_uri).await?;
        let raster = tokio::task::spawn_blocking(move || decode_geotiff(&bytes))
            .await
            .map_err(|e| LakesError::Catalog(e.into()))??;
        if raster.shape() != (grid.rows, grid.cols) {
            return Err(LakesError::DimensionMismatch {
                layer_kind: layer.layer_kind.as_api().to_string(),
                rows: grid.rows,
                cols: grid.cols,
                actual_rows: raster.rows,
                actual_cols: raster.cols,
            });
        }
        Ok(raster)
    }

    /// Water, inhabited and blocked masks of a dataset version, cached per
    /// (lake, dataset).
    pub async fn constraint_masks(
        &self,
        lake_id: Uuid,
        dataset_version_id: Uuid,
        grid: &GridSpec,
    ) -> Result<Arc<ConstraintMasks>, LakesError> {
        let key = (lake_id, dataset_version_id);
        if let Some(masks) = self.constraints_cache.get(&key).await {
            return Ok(masks);
        }

        let water_layer = self.layer(lake_id, dataset_version_id, LayerKind::Water).await?;
        let inhabitants_layer = self
            .layer(lake_id, dataset_version_id, LayerKind::Inhabitants)
            .await?;
        let water = self.load_raster(&water_layer, grid).await?;
        let inhabitants = self.load_raster(&inhabitants_layer, grid).await?;

        let masks = Arc::new(ConstraintMasks::from_layers(&water, &inhabitants));
        self.constraints_cache.insert(key, masks.clone()).await;
        tracing::debug!(%lake_id, %dataset_version_id, "constraint masks cached");
        Ok(masks)
    }
}
