use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::simulations::core::views::SimulationSummary;
use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

pub async fn finalize(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(simulation_id): ApiPath<Uuid>,
) -> Response {
    match state.simulations.finalize(simulation_id, user.id).await {
        Ok(simulation) => json_ok(SimulationSummary::from(simulation)),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn unfinalize(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(simulation_id): ApiPath<Uuid>,
) -> Response {
    match state.simulations.unfinalize(simulation_id, user.id).await {
        Ok(simulation) => json_ok(SimulationSummary::from(simulation)),
        Err(e) => AppError::from(e).into_response(),
    }
}
