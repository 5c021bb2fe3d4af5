use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::simulations::core::views::SimulationSummary;
use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::ok;
use crate::shell::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSimulationBody {
    pub lake_id: Uuid,
    pub name: String,
    pub dataset_version_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLakeSimulationBody {
    pub name: String,
    pub dataset_version_id: Option<Uuid>,
}

async fn create(
    state: &AppState,
    user_id: Uuid,
    lake_id: Uuid,
    name: &str,
    dataset_version_id: Option<Uuid>,
) -> Response {
    match state
        .simulations
        .create_simulation(user_id, lake_id, name, dataset_version_id)
        .await
    {
        Ok(simulation) => ok(SimulationSummary::from(simulation)).respond(StatusCode::CREATED),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn handle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateSimulationBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };
    create(&state, user.id, body.lake_id, &body.name, body.dataset_version_id).await
}

pub async fn handle_for_lake(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(lake_id): ApiPath<Uuid>,
    body: Result<Json<CreateLakeSimulationBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };
    create(&state, user.id, lake_id, &body.name, body.dataset_version_id).await
}
