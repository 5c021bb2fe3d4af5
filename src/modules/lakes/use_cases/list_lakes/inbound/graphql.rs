use async_graphql::{Context, Object, Result as GqlResult};
use uuid::Uuid;

use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::views::LakeSummary;
use crate::modules::lakes::errors::LakesError;
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlLake {
    pub id: Uuid,
    pub name: String,
    pub active_dataset_version_id: Option<Uuid>,
    pub grid: GridSpec,
}

impl From<LakeSummary> for GqlLake {
    fn from(v: LakeSummary) -> Self {
        Self {
            id: v.id,
            name: v.name,
            active_dataset_version_id: v.active_dataset_version_id,
            grid: v.grid,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn lakes(&self, context: &Context<'_>) -> GqlResult<Vec<GqlLake>> {
        let state = context.data_unchecked::<AppState>();
        let lakes = state
            .lakes
            .list_lakes()
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(lakes.into_iter().map(Into::into).collect())
    }

    async fn lake(&self, context: &Context<'_>, id: Uuid) -> GqlResult<Option<GqlLake>> {
        let state = context.data_unchecked::<AppState>();
        match state.lakes.lake_summary(id).await {
            Ok(summary) => Ok(Some(summary.into())),
            Err(LakesError::LakeNotFound(_)) => Ok(None),
            Err(e) => Err(async_graphql::Error::new(e.to_string())),
        }
    }
}
