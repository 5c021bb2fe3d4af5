use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::modules::users::core::user::User;
use crate::modules::users::errors::UsersError;
use crate::shared::core::errors::AppError;
use crate::shell::state::AppState;

/// The authenticated caller, resolved from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(UsersError::MissingToken)?;
        let user = state.users.current_user(token).await?;
        Ok(CurrentUser(user))
    }
}
