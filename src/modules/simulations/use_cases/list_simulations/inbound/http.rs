use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::simulations::core::views::SimulationSummary;
use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListSimulationsParams {
    pub lake_id: Option<Uuid>,
}

async fn list(state: &AppState, user_id: Uuid, lake_id: Option<Uuid>) -> Response {
    match state.simulations.list_simulations(user_id, lake_id).await {
        Ok(simulations) => json_ok(
            simulations
                .into_iter()
                .map(SimulationSummary::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn handle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListSimulationsParams>,
) -> Response {
    list(&state, user.id, params.lake_id).await
}

pub async fn handle_for_lake(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(lake_id): ApiPath<Uuid>,
) -> Response {
    list(&state, user.id, Some(lake_id)).await
}

#[cfg(test)]
mod list_simulations_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::shell::state::AppState;
    use crate::tests::fixtures::http::body_json;
    use crate::tests::fixtures::lakes::seed_lake;
    use crate::tests::fixtures::state::{make_test_context, signed_up_user};

    use super::{handle, handle_for_lake};

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/simulations", get(handle))
            .route("/lakes/{lake_id}/simulations", get(handle_for_lake))
            .with_state(state)
    }

    fn authorized_get(uri: String, token: &str) -> Request<Body> {
        Request::get(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn it_should_list_the_callers_simulations() {
        let context = make_test_context().await;
        let seeded = seed_lake(&context.catalog, &context.store, "Lago").await;
        let (user_id, token) = signed_up_user(&context.state, "list@example.com").await;
        context
            .state
            .simulations
            .create_simulation(user_id, seeded.lake_id, "Mine", None)
            .await
            .unwrap();

        let router = app(context.state);
        let response = router
            .clone()
            .oneshot(authorized_get(
                format!("/simulations?lake_id={}", seeded.lake_id),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["data"][0]["name"], json!("Mine"));

        let response = router
            .oneshot(authorized_get(format!("/lakes/{}/simulations", seeded.lake_id), &token))
            .await
            .unwrap();
        let payload = body_json(response).await;
        assert_eq!(payload["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn a_bad_token_should_be_401() {
        let context = make_test_context().await;
        let response = app(context.state)
            .oneshot(authorized_get("/simulations".into(), "garbage"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let payload = body_json(response).await;
        assert_eq!(payload["error"]["code"], json!("INVALID_TOKEN"));
    }
}
