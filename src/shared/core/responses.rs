// Response envelope shared by every HTTP endpoint.
//
// Success: {"ok": true, "data": ..., "error": null, "message": ...}
// Failure: {"ok": false, "data": ..., "error": {"code", "message", "meta"}, "message": ...}
//
// Extra keys are flattened to the top level so legacy clients can keep
// reading fields such as `access_token` without unwrapping `data`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub meta: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T: Serialize> Envelope<T> {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.meta = meta;
        }
        self
    }

    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        self.respond(StatusCode::OK)
    }
}

pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    Envelope {
        ok: true,
        data: Some(data),
        error: None,
        message: None,
        extra: Map::new(),
    }
}

pub fn fail<T: Serialize>(code: impl Into<String>, message: impl Into<String>) -> Envelope<T> {
    let message = message.into();
    Envelope {
        ok: false,
        data: None,
        error: Some(ErrorBody {
            code: code.into(),
            message: message.clone(),
            meta: Value::Object(Map::new()),
        }),
        message: Some(message),
        extra: Map::new(),
    }
}

pub fn fail_with_data<T: Serialize>(
    code: impl Into<String>,
    message: impl Into<String>,
    data: T,
) -> Envelope<T> {
    let mut envelope = fail(code, message);
    envelope.data = Some(data);
    envelope
}

pub fn json_ok<T: Serialize>(data: T) -> Response {
    ok(data).respond(StatusCode::OK)
}

pub fn json_fail(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Response {
    fail::<Value>(code, message).respond(status)
}

#[cfg(test)]
mod envelope_tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    fn it_should_build_the_minimal_success_shape() {
        let value = serde_json::to_value(ok(json!({"a": 1}))).unwrap();
        assert_eq!(value["ok"], json!(true));
        assert_eq!(value["data"], json!({"a": 1}));
        assert_eq!(value["error"], Value::Null);
        assert_eq!(value["message"], Value::Null);
    }

    #[rstest]
    fn it_should_build_the_minimal_failure_shape() {
        let value = serde_json::to_value(fail::<Value>("E", "M")).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["data"], Value::Null);
        assert_eq!(value["error"]["code"], json!("E"));
        assert_eq!(value["error"]["message"], json!("M"));
        assert_eq!(value["error"]["meta"], json!({}));
        assert_eq!(value["message"], json!("M"));
    }

    #[rstest]
    fn it_should_flatten_extras_to_the_top_level() {
        let value = serde_json::to_value(
            ok(json!({"access_token": "abc"})).with_extra("access_token", "abc"),
        )
        .unwrap();
        assert_eq!(value["access_token"], json!("abc"));
        assert_eq!(value["data"]["access_token"], json!("abc"));
    }

    #[rstest]
    fn it_should_attach_meta_only_to_failures() {
        let failure = serde_json::to_value(
            fail::<Value>("E", "M").with_meta(json!({"lake_id": "x"})),
        )
        .unwrap();
        assert_eq!(failure["error"]["meta"], json!({"lake_id": "x"}));

        let success = serde_json::to_value(ok(1).with_meta(json!({"ignored": true}))).unwrap();
        assert_eq!(success["error"], Value::Null);
    }

    #[tokio::test]
    async fn json_ok_should_answer_200_with_the_envelope() {
        let response = json_ok(json!({"x": 2}));
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], json!(true));
        assert_eq!(payload["data"], json!({"x": 2}));
    }

    #[tokio::test]
    async fn json_fail_should_use_the_given_status() {
        let response = json_fail(StatusCode::BAD_REQUEST, "ERR", "boom");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], json!(false));
        assert_eq!(payload["error"]["code"], json!("ERR"));
    }

    #[tokio::test]
    async fn a_failure_may_carry_data_with_status_200() {
        let response = fail_with_data("INVALID_SELECTION", "invalid", json!({"ok": false}))
            .respond(StatusCode::OK);
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["data"], json!({"ok": false}));
        assert_eq!(payload["error"]["code"], json!("INVALID_SELECTION"));
    }
}
