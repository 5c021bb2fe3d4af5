use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::shared::core::errors::AppError;
use crate::shared::core::extract::ApiPath;
use crate::shared::core::responses::json_ok;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    ApiPath((lake_id, dataset_version_id, layer_kind)): ApiPath<(Uuid, Uuid, String)>,
) -> Response {
    match state
        .lakes
        .layer_stats(lake_id, dataset_version_id, &layer_kind)
        .await
    {
        Ok(stats) => json_ok(stats),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[cfg(test)]
mod layer_stats_http_inbound_tests {
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
    use crate::tests::fixtures::lakes::{SeededLake, seed_lake};
    use crate::tests::fixtures::state::make_test_context;

    use super::handle;

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/lakes/{lake_id}/datasets/{dataset_version_id}/layers/{layer_kind}/stats",
                get(handle),
            )
            .with_state(state)
    }

    fn stats_request(seeded: &SeededLake, kind: &str) -> Request<Body> {
        Request::get(format!(
            "/lakes/{}/datasets/{}/layers/{kind}/stats",
            seeded.lake_id, seeded.dataset_version_id
        ))
        .body(Body::empty())
        .unwrap()
    }

    #[tokio::test]
    async fn it_should_return_inhabitants_stats() {
        let context = make_test_context().await;
        let seeded = seed_lake(&context.catalog, &context.store, "Lago").await;

        let response = app(context.state)
            .oneshot(stats_request(&seeded, "inhabitants"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["data"]["layer_kind"], json!("inhabitants"));
        assert_eq!(payload["data"]["dtype"], json!("float32"));
        assert_eq!(payload["data"]["nodata"], json!(0.0));
        assert_eq!(payload["data"]["stats"]["count"], json!(1));
        assert_eq!(payload["data"]["stats"]["inhabited_cells"], json!(1));
        assert_eq!(payload["data"]["stats"]["total_inhabitants"], json!(5.0));
    }

    #[tokio::test]
    async fn an_unknown_kind_should_return_404_with_meta() {
        let context = make_test_context().await;
        let seeded = seed_lake(&context.catalog, &context.store, "Lago").await;

        let response = app(context.state)
            .oneshot(stats_request(&seeded, "depth"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = body_json(response).await;
        assert_eq!(payload["error"]["code"], json!("LAYER_NOT_FOUND"));
        assert_eq!(payload["error"]["meta"]["layer_kind"], json!("depth"));
        assert_eq!(
            payload["error"]["meta"]["dataset_version_id"],
            json!(seeded.dataset_version_id)
        );
    }
}
