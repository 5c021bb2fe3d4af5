use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::modules::users::use_cases::refresh_session::inbound::http::RefreshTokenBody;
use crate::shared::core::errors::AppError;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<RefreshTokenBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state.users.log_out(&body.refresh_token).await {
        Ok(()) => json_ok(json!({ "revoked": true })),
        Err(e) => AppError::from(e).into_response(),
    }
}
