use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::shell::http::router;
use crate::tests::fixtures::http::body_json;
use crate::tests::fixtures::lakes::{cells_polygon, seed_lake};
use crate::tests::fixtures::state::make_test_context;

async fn send(
    app: &Router,
    method: &str,
    uri: String,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn plans_a_simulation_on_a_lake_from_signup_to_run() {
    let context = make_test_context().await;
    let seeded = seed_lake(&context.catalog, &context.store, "Lago San Roque").await;
    let app = router(context.state);

    let (status, signed_up) = send(
        &app,
        "POST",
        "/signup".into(),
        None,
        Some(json!({"email": "planner@example.com", "password": "StrongPass123!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = signed_up["access_token"].as_str().unwrap().to_string();

    let (status, lakes) = send(&app, "GET", "/lakes".into(), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lakes["data"][0]["name"], json!("Lago San Roque"));

    let selection = json!({
        "geometry": cells_polygon(&seeded.grid, 1, 1, 0, 1),
        "geometry_crs": "EPSG:3857",
    });
    let (_, validated) = send(
        &app,
        "POST",
        format!("/lakes/{}/validate-geometry", seeded.lake_id),
        None,
        Some(selection.clone()),
    )
    .await;
    assert_eq!(validated["ok"], json!(true));
    assert_eq!(validated["data"]["selected_cells"], json!(2));

    let (status, created) = send(
        &app,
        "POST",
        format!("/lakes/{}/simulations", seeded.lake_id),
        Some(&token),
        Some(json!({"name": "Costanera"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created["data"]["dataset_version_id"],
        json!(seeded.dataset_version_id.to_string())
    );
    let simulation_id = created["data"]["id"].as_str().unwrap().to_string();

    let mut subdivision = selection;
    subdivision["inhabitants"] = json!(100);
    subdivision["impact_factor"] = json!(0.5);
    let (status, added) = send(
        &app,
        "POST",
        format!("/simulations/{simulation_id}/subdivisions"),
        Some(&token),
        Some(subdivision.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["data"]["simulation"]["total_selected_cells"], json!(2));

    let (status, finalized) = send(
        &app,
        "POST",
        format!("/simulations/{simulation_id}/finalize"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finalized["data"]["status"], json!("FINALIZED"));

    let (status, locked) = send(
        &app,
        "POST",
        format!("/simulations/{simulation_id}/subdivisions"),
        Some(&token),
        Some(subdivision),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(locked["error"]["code"], json!("SIMULATION_FINALIZED"));

    let (status, run) = send(
        &app,
        "POST",
        format!("/simulations/{simulation_id}/runs"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(run["data"]["total_selected_cells"], json!(2));
    assert_eq!(run["data"]["total_inhabitants"], json!(100));
    assert_eq!(run["data"]["weighted_impact"].as_f64(), Some(50.0));

    let (status, listed) = send(&app, "GET", "/simulations".into(), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
}
