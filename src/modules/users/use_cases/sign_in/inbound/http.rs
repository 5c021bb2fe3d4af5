use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use crate::modules::users::use_cases::sign_up::inbound::http::{
    CredentialsBody, token_pair_response,
};
use crate::shared::core::errors::AppError;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state.users.sign_in(&body.email, &body.password).await {
        Ok(pair) => token_pair_response(pair),
        Err(e) => AppError::from(e).into_response(),
    }
}
