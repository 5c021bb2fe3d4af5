use axum::{
    Extension, Router,
    http::HeaderValue,
    response::Response,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::modules::lakes::use_cases::assess_selection::inbound::http as assess_http;
use crate::modules::lakes::use_cases::blocked_mask::inbound::http as blocked_http;
use crate::modules::lakes::use_cases::get_lake::inbound::http as lake_http;
use crate::modules::lakes::use_cases::layer_stats::inbound::http as stats_http;
use crate::modules::lakes::use_cases::list_lakes::inbound::http as lakes_http;
use crate::modules::simulations::use_cases::create_simulation::inbound::http as create_sim_http;
use crate::modules::simulations::use_cases::finalize_simulation::inbound::http as finalize_http;
use crate::modules::simulations::use_cases::get_simulation::inbound::http as get_sim_http;
use crate::modules::simulations::use_cases::list_simulations::inbound::http as list_sims_http;
use crate::modules::simulations::use_cases::manage_subdivisions::inbound::http as subdivisions_http;
use crate::modules::simulations::use_cases::simulation_runs::inbound::http as runs_http;
use crate::modules::users::use_cases::current_user::inbound::http as me_http;
use crate::modules::users::use_cases::log_out::inbound::http as logout_http;
use crate::modules::users::use_cases::refresh_session::inbound::http as refresh_http;
use crate::modules::users::use_cases::sign_in::inbound::http as signin_http;
use crate::modules::users::use_cases::sign_up::inbound::http as signup_http;
use crate::shared::core::responses::json_ok;
use crate::shell::config::Settings;
use crate::shell::graphql::{build_schema, graphiql, graphql};
use crate::shell::state::AppState;

async fn health() -> Response {
    json_ok(json!({"status": "ok"}))
}

pub fn router(state: AppState) -> Router {
    let schema = build_schema(state.clone());
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup_http::handle))
        .route("/signin", post(signin_http::handle))
        .route("/refresh", post(refresh_http::handle))
        .route("/logout", post(logout_http::handle))
        .route("/me", get(me_http::handle))
        .route("/lakes", get(lakes_http::handle))
        .route("/lakes/{lake_id}", get(lake_http::detail))
        .route("/lakes/{lake_id}/grid", get(lake_http::grid))
        .route("/lakes/{lake_id}/datasets/active", get(lake_http::active_dataset))
        .route(
            "/lakes/{lake_id}/datasets/{dataset_version_id}/layers/{layer_kind}/stats",
            get(stats_http::handle),
        )
        .route("/lakes/{lake_id}/blocked-mask", get(blocked_http::handle))
        .route("/lakes/{lake_id}/validate-geometry", post(assess_http::validate))
        .route("/lakes/{lake_id}/rasterize-geometry", post(assess_http::rasterize))
        .route(
            "/lakes/{lake_id}/simulations",
            get(list_sims_http::handle_for_lake).post(create_sim_http::handle_for_lake),
        )
        .route(
            "/simulations",
            get(list_sims_http::handle).post(create_sim_http::handle),
        )
        .route("/simulations/{simulation_id}", get(get_sim_http::handle))
        .route(
            "/simulations/{simulation_id}/subdivisions/validate",
            post(subdivisions_http::validate),
        )
        .route(
            "/simulations/{simulation_id}/subdivisions",
            post(subdivisions_http::add),
        )
        .route(
            "/simulations/{simulation_id}/subdivisions/{subdivision_id}",
            delete(subdivisions_http::delete),
        )
        .route("/simulations/{simulation_id}/finalize", post(finalize_http::finalize))
        .route("/simulations/{simulation_id}/unfinalize", post(finalize_http::unfinalize))
        .route("/simulations/{simulation_id}/runs", post(runs_http::create))
        .route("/runs/{run_id}", get(runs_http::get))
        .route("/gql", get(graphiql).post(graphql))
        .with_state(state)
        .layer(Extension(schema))
        .layer(TraceLayer::new_for_http())
}

/// Permissive in development when no origins are configured.
pub fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.cors_allowed_origins.is_empty() {
        if settings.is_dev() {
            return CorsLayer::permissive();
        }
        return CorsLayer::new();
    }
    let origins: Vec<HeaderValue> = settings
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod router_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::tests::fixtures::http::body_json;
    use crate::tests::fixtures::state::make_test_context;

    use super::router;

    #[tokio::test]
    async fn health_should_answer_ok() {
        let context = make_test_context().await;
        let response = router(context.state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], json!("ok"));
    }

    #[tokio::test]
    async fn graphql_should_be_served_on_gql() {
        let context = make_test_context().await;
        let response = router(context.state)
            .oneshot(
                Request::post("/gql")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"query": "{ lakes { id } }"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["lakes"], json!([]));
    }

    #[tokio::test]
    async fn simulations_should_require_a_token() {
        let context = make_test_context().await;
        let response = router(context.state)
            .oneshot(Request::get("/simulations").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], json!("MISSING_TOKEN"));
    }
}
