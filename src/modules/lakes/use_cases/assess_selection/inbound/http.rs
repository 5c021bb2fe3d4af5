use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::modules::lakes::core::selection::SelectionInput;
use crate::modules::lakes::core::views::GeometryValidationResponse;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::{fail_with_data, json_ok};
use crate::shell::state::AppState;

/// Drawable rejections answer 200 with `ok = false`, the counts in `meta`
/// and the full validation in `data`.
pub fn invalid_selection_response(validation: GeometryValidationResponse) -> Response {
    let meta = json!({
        "selected_cells": validation.selected_cells,
        "water_hits": validation.blocked_breakdown.water,
        "inhabitants_hits": validation.blocked_breakdown.inhabitants,
        "nodata_hits": 0,
        "blocked_cells": validation.blocked_cells,
    });
    fail_with_data("INVALID_SELECTION", "Geometry selection is invalid.", validation)
        .with_meta(meta)
        .respond(StatusCode::OK)
}

pub async fn validate(
    State(state): State<AppState>,
    ApiPath(lake_id): ApiPath<Uuid>,
    body: Result<Json<SelectionInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state.lakes.validate_geometry(lake_id, &body).await {
        Ok(validation) if validation.ok => json_ok(validation),
        Ok(validation) => invalid_selection_response(validation),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn rasterize(
    State(state): State<AppState>,
    ApiPath(lake_id): ApiPath<Uuid>,
    body: Result<Json<SelectionInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state.lakes.rasterize_geometry(lake_id, &body).await {
        Ok(selection) => json_ok(selection),
        Err(e) => AppError::from(e).into_response(),
    }
}
