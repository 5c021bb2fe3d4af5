use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::users::adapters::inbound::current_user::CurrentUser;
use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::{json_ok, ok};
use crate::shell::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(simulation_id): ApiPath<Uuid>,
) -> Response {
    match state.simulations.create_run(simulation_id, user.id).await {
        Ok(run) => ok(run).respond(StatusCode::CREATED),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(run_id): ApiPath<Uuid>,
) -> Response {
    match state.simulations.get_run(run_id, user.id).await {
        Ok(run) => json_ok(run),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[cfg(test)]
mod simulation_runs_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::shell::state::AppState;
    use crate::tests::fixtures::http::body_json;
    use crate::tests::fixtures::lakes::seed_lake;
    use crate::tests::fixtures::state::{make_test_context, signed_up_user};

    use super::{create, get};

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/simulations/{simulation_id}/runs", routing::post(create))
            .route("/runs/{run_id}", routing::get(get))
            .with_state(state)
    }

    #[tokio::test]
    async fn it_should_create_and_fetch_a_run() {
        let context = make_test_context().await;
        let seeded = seed_lake(&context.catalog, &context.store, "Lago").await;
        let (user_id, token) = signed_up_user(&context.state, "runs@example.com").await;
        let simulation = context
            .state
            .simulations
            .create_simulation(user_id, seeded.lake_id, "Plan", None)
            .await
            .unwrap();
        let router = app(context.state);

        let response = router
            .clone()
            .oneshot(
                Request::post(format!("/simulations/{}/runs", simulation.id))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["data"]["status"], json!("COMPLETED"));
        assert_eq!(created["data"]["total_inhabitants"], json!(0));
        let run_id = created["data"]["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                Request::get(format!("/runs/{run_id}"))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["id"], json!(run_id));
    }

    #[tokio::test]
    async fn an_unknown_run_should_be_404() {
        let context = make_test_context().await;
        let (_, token) = signed_up_user(&context.state, "norun@example.com").await;

        let response = app(context.state)
            .oneshot(
                Request::get(format!("/runs/{}", uuid::Uuid::now_v7()))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], json!("RUN_NOT_FOUND"));
    }
}
