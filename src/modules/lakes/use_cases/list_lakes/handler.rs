use uuid::Uuid;

use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::lake::Lake;
use crate::modules::lakes::core::views::LakeSummary;
use crate::modules::lakes::errors::LakesError;
use crate::modules::lakes::service::LakesService;

impl LakesService {
    /// Every lake, sorted by name.
    pub async fn list_lakes(&self) -> Result<Vec<LakeSummary>, LakesError> {
        let mut lakes = self.catalog.list_lakes().await?;
        lakes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut summaries = Vec::with_capacity(lakes.len());
        for lake in &lakes {
            summaries.push(self.summarize(lake).await?);
        }
        Ok(summaries)
    }

    pub async fn lake_summary(&self, lake_id: Uuid) -> Result<LakeSummary, LakesError> {
        let lake = self.lake(lake_id).await?;
        self.summarize(&lake).await
    }

    pub(crate) async fn summarize(&self, lake: &Lake) -> Result<LakeSummary, LakesError> {
        let grid = GridSpec::from_lake(lake)?;
        let active = self.catalog.active_dataset(lake.id).await?;
        Ok(LakeSummary {
            id: lake.id,
            name: lake.name.clone(),
            active_dataset_version_id: active.map(|d| d.id),
            grid,
        })
    }
}
