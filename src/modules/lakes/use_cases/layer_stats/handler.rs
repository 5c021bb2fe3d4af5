use uuid::Uuid;

use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::lake::LayerKind;
use crate::modules::lakes::core::stats::compute_stats;
use crate::modules::lakes::core::views::LayerStatsResponse;
use crate::modules::lakes::errors::LakesError;
use crate::modules::lakes::service::LakesService;

impl LakesService {
    /// Summary statistics of one layer, cached per (lake, dataset, kind).
    /// Unknown kinds are reported as a missing layer.
    pub async fn layer_stats(
        &self,
        lake_id: Uuid,
        dataset_version_id: Uuid,
        layer_kind: &str,
    ) -> Result<LayerStatsResponse, LakesError> {
        let kind = LayerKind::from_api(layer_kind).ok_or_else(|| LakesError::LayerNotFound {
            lake_id,
            dataset_version_id,
            layer_kind: layer_kind.to_string(),
        })?;
        let key = (lake_id, dataset_version_id, kind);
        if let Some(cached) = self.stats_cache.get(&key).await {
            return Ok(cached);
        }

        let lake = self.lake(lake_id).await?;
        let grid = GridSpec::from_lake(&lake)?;
        let dataset = self
            .resolve_dataset_version(lake_id, Some(dataset_version_id))
            .await?;
        let layer = self.layer(lake_id, dataset.id, kind).await?;
        let raster = self.load_raster(&layer, &grid).await?;

        let response = LayerStatsResponse {
            lake_id,
            dataset_version_id: dataset.id,
            layer_kind: kind,
            rows: grid.rows,
            cols: grid.cols,
            stats: compute_stats(&raster, kind, layer.nodata),
            dtype: layer.dtype,
            nodata: layer.nodata,
        };
        self.stats_cache.insert(key, response.clone()).await;
        Ok(response)
    }
}
