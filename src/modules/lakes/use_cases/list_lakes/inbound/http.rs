use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::shared::core::errors::AppError;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>) -> Response {
    match state.lakes.list_lakes().await {
        Ok(lakes) => json_ok(lakes),
        Err(e) => AppError::from(e).into_response(),
    }
}
