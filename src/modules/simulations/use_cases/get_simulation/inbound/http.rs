use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(simulation_id): ApiPath<Uuid>,
) -> Response {
    match state.simulations.get_simulation(simulation_id, user.id).await {
        Ok(detail) => json_ok(detail),
        Err(e) => AppError::from(e).into_response(),
    }
}
