use uuid::Uuid;

use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::views::{
    DatasetVersionSummary, GridManifest, LakeBounds, LakeDetail,
};
use crate::modules::lakes::errors::LakesError;
use crate::modules::lakes::service::LakesService;

impl LakesService {
    pub async fn lake_detail(&self, lake_id: Uuid) -> Result<LakeDetail, LakesError> {
        let lake = self.lake(lake_id).await?;
        let summary = self.summarize(&lake).await?;
        let bounds =
            LakeBounds::from_grid(&summary.grid).map_err(|_| LakesError::InvalidGrid(lake.id))?;
        Ok(LakeDetail { summary, bounds })
    }

    /// Map bootstrap payload: the grid plus its bounds in the lake CRS and WGS84.
    pub async fn grid_manifest(&self, lake_id: Uuid) -> Result<GridManifest, LakesError> {
        let lake = self.lake(lake_id).await?;
        let grid = GridSpec::from_lake(&lake)?;
        let bounds = LakeBounds::from_grid(&grid).map_err(|_| LakesError::InvalidGrid(lake.id))?;
        Ok(GridManifest {
            lake_id,
            grid,
            bounds,
        })
    }

    pub async fn active_dataset(&self, lake_id: Uuid) -> Result<DatasetVersionSummary, LakesError> {
        self.lake(lake_id).await?;
        let dataset = self.resolve_dataset_version(lake_id, None).await?;
        Ok(dataset.into())
    }
}
