use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

pub async fn detail(State(state): State<AppState>, ApiPath(lake_id): ApiPath<Uuid>) -> Response {
    match state.lakes.lake_detail(lake_id).await {
        Ok(detail) => json_ok(detail),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn grid(State(state): State<AppState>, ApiPath(lake_id): ApiPath<Uuid>) -> Response {
    match state.lakes.grid_manifest(lake_id).await {
        Ok(manifest) => json_ok(manifest),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn active_dataset(
    State(state): State<AppState>,
    ApiPath(lake_id): ApiPath<Uuid>,
) -> Response {
    match state.lakes.active_dataset(lake_id).await {
        Ok(dataset) => json_ok(dataset),
        Err(e) => AppError::from(e).into_response(),
    }
}
