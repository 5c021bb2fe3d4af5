use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::modules::users::service::TokenPair;
use crate::shared::core::errors::AppError;
use crate::shared::core::responses::ok;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

/// Token pair in `data`, with `access_token` and `token_type` repeated at the
/// top level for older clients.
pub fn token_pair_response(pair: TokenPair) -> Response {
    let access_token = pair.access_token.clone();
    let token_type = pair.token_type.clone();
    ok(pair)
        .with_extra("access_token", access_token)
        .with_extra("token_type", token_type)
        .into_response()
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return AppError::invalid_payload(rejection.body_text()).into_response(),
    };

    match state.users.sign_up(&body.email, &body.password).await {
        Ok(pair) => token_pair_response(pair),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[cfg(test)]
mod sign_up_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::shell::state::AppState;
    use crate::tests::fixtures::http::body_json;
    use crate::tests::fixtures::state::make_test_context;

    use super::handle;

    fn app(state: AppState) -> Router {
        Router::new().route("/signup", post(handle)).with_state(state)
    }

    fn signup_request(body: &str) -> Request<Body> {
        Request::post("/signup")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn it_should_return_200_with_tokens_in_data_and_at_the_top_level() {
        let context = make_test_context().await;
        let response = app(context.state)
            .oneshot(signup_request(
                r#"{"email":"new@example.com","password":"StrongPass123!"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], json!(true));
        assert_eq!(payload["token_type"], json!("bearer"));
        assert_eq!(payload["access_token"], payload["data"]["access_token"]);
        assert!(payload["data"]["refresh_token"].is_string());
    }

    #[tokio::test]
    async fn it_should_return_400_when_the_email_is_taken() {
        let context = make_test_context().await;
        let router = app(context.state);
        let body = r#"{"email":"taken@example.com","password":"StrongPass123!"}"#;
        router.clone().oneshot(signup_request(body)).await.unwrap();

        let response = router.oneshot(signup_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_eq!(payload["error"]["code"], json!("EMAIL_ALREADY_REGISTERED"));
    }

    #[tokio::test]
    async fn it_should_return_422_for_a_weak_password() {
        let context = make_test_context().await;
        let response = app(context.state)
            .oneshot(signup_request(r#"{"email":"a@example.com","password":"short"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = body_json(response).await;
        assert_eq!(payload["error"]["code"], json!("WEAK_PASSWORD"));
    }

    #[tokio::test]
    async fn it_should_return_422_on_invalid_json() {
        let context = make_test_context().await;
        let response = app(context.state)
            .oneshot(signup_request("not-json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = body_json(response).await;
        assert_eq!(payload["error"]["code"], json!("INVALID_PAYLOAD"));
    }
}
