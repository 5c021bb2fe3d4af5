use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::responses::json_ok;

#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
}

pub async fn handle(CurrentUser(user): CurrentUser) -> Response {
    json_ok(MeResponse {
        id: user.id,
        email: user.email,
    })
}
