use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
