use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::modules::simulations::core::simulation::SubdivisionInput;
use crate::modules::simulations::core::views::{SimulationSummary, SubdivisionValidation};
use crate::modules::simulations::use_cases::manage_subdivisions::handler::SubdivisionOutcome;
use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::{fail_with_data, json_ok, ok};
use crate::shell::state::AppState;

fn rejected_subdivision_response(validation: SubdivisionValidation) -> Response {
    let code = validation.rejection_code().to_string();
    let message = validation
        .errors
        .first()
        .map(|issue| issue.message.clone())
        .unwrap_or_else(|| "Subdivision selection is invalid.".into());
    let meta = json!({
        "selected_cells": validation.selected_cells,
        "water_hits": validation.blocked_breakdown.water,
        "inhabitants_hits": validation.blocked_breakdown.inhabitants,
        "nodata_hits": 0,
        "blocked_cells": validation.blocked_cells,
        "overlap_cells": validation.overlap_cells,
    });
    fail_with_data(code, message, validation)
        .with_meta(meta)
        .respond(StatusCode::OK)
}

pub async fn validate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(simulation_id): ApiPath<Uuid>,
    body: Result<Json<SubdivisionInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state
        .simulations
        .validate_subdivision(simulation_id, user.id, &body)
        .await
    {
        Ok(validation) if validation.ok => json_ok(validation),
        Ok(validation) => rejected_subdivision_response(validation),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(simulation_id): ApiPath<Uuid>,
    body: Result<Json<SubdivisionInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state
        .simulations
        .add_subdivision(simulation_id, user.id, &body)
        .await
    {
        Ok(SubdivisionOutcome::Added(added)) => ok(added).respond(StatusCode::CREATED),
        Ok(SubdivisionOutcome::Rejected(validation)) => rejected_subdivision_response(validation),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath((simulation_id, subdivision_id)): ApiPath<(Uuid, Uuid)>,
) -> Response {
    match state
        .simulations
        .delete_subdivision(simulation_id, subdivision_id, user.id)
        .await
    {
        Ok(simulation) => json_ok(SimulationSummary::from(simulation)),
        Err(e) => AppError::from(e).into_response(),
    }
}
