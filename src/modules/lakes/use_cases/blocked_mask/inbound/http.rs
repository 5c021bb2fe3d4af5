use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DatasetParams {
    pub dataset_version_id: Option<Uuid>,
}

pub async fn handle(
    State(state): State<AppState>,
    ApiPath(lake_id): ApiPath<Uuid>,
    Query(params): Query<DatasetParams>,
) -> Response {
    match state
        .lakes
        .blocked_mask(lake_id, params.dataset_version_id)
        .await
    {
        Ok(mask) => json_ok(mask),
        Err(e) => AppError::from(e).into_response(),
    }
}
