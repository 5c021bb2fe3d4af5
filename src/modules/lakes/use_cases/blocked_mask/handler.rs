use uuid::Uuid;

use crate::modules::lakes::core::bitset::STORAGE_LEVEL;
use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::views::{BitsetContract, BlockedMaskResponse};
use crate::modules::lakes::errors::LakesError;
use crate::modules::lakes::service::LakesService;

impl LakesService {
    /// Cells no selection may cover: water OR inhabited.
    pub async fn blocked_mask(
        &self,
        lake_id: Uuid,
        dataset_version_id: Option<Uuid>,
    ) -> Result<BlockedMaskResponse, LakesError> {
        let lake = self.lake(lake_id).await?;
        let grid = GridSpec::from_lake(&lake)?;
        let dataset = self
            .resolve_dataset_version(lake_id, dataset_version_id)
            .await?;
        let masks = self.constraint_masks(lake_id, dataset.id, &grid).await?;

        Ok(BlockedMaskResponse {
            lake_id,
            dataset_version_id: dataset.id,
            rows: grid.rows,
            cols: grid.cols,
            contract: BitsetContract::default(),
            blocked_bitset_base64: masks.blocked.encode(STORAGE_LEVEL)?,
            blocked_count: masks.blocked.count(),
            water_count: masks.water.count(),
            inhabited_count: masks.inhabited.count(),
        })
    }
}
