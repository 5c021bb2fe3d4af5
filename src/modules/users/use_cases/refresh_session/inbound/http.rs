use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::modules::users::use_cases::sign_up::inbound::http::token_pair_response;
use crate::shared::core::errors::AppError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct RefreshTokenBody {
    pub refresh_token: String,
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<RefreshTokenBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state.users.refresh(&body.refresh_token).await {
        Ok(pair) => token_pair_response(pair),
        Err(e) => AppError::from(e).into_response(),
    }
}
