use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::shared::core::responses::fail;

/// Typed failure rendered through the response envelope.
///
/// Every module error converts into this type at the HTTP boundary. 4xx codes
/// describe access or resource problems, 5xx codes infrastructure problems.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{code}: {message}")]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub meta: Option<Value>,
}

impl AppError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    pub fn unprocessable(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    /// Rejection for request bodies that are not valid JSON for the endpoint.
    pub fn invalid_payload(detail: impl Into<String>) -> Self {
        Self::unprocessable("INVALID_PAYLOAD", detail)
    }

    /// Rejection for path segments that do not parse, such as a malformed id.
    pub fn invalid_path(detail: impl Into<String>) -> Self {
        Self::bad_request("INVALID_PATH", detail)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }
        let mut envelope = fail::<Value>(self.code, self.message);
        if let Some(meta) = self.meta {
            envelope = envelope.with_meta(meta);
        }
        envelope.respond(self.status)
    }
}

#[cfg(test)]
mod app_error_tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(AppError::bad_request("C", "m"), StatusCode::BAD_REQUEST)]
    #[case(AppError::unauthorized("C", "m"), StatusCode::UNAUTHORIZED)]
    #[case(AppError::forbidden("C", "m"), StatusCode::FORBIDDEN)]
    #[case(AppError::not_found("C", "m"), StatusCode::NOT_FOUND)]
    #[case(AppError::conflict("C", "m"), StatusCode::CONFLICT)]
    #[case(AppError::unprocessable("C", "m"), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(AppError::internal("C", "m"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn constructors_should_pick_the_status(#[case] error: AppError, #[case] status: StatusCode) {
        assert_eq!(error.status, status);
        assert_eq!(error.to_string(), "C: m");
    }

    #[tokio::test]
    async fn it_should_render_the_failure_envelope_with_meta() {
        let response = AppError::not_found("LAKE_NOT_FOUND", "Lake not found")
            .with_meta(json!({"lake_id": "abc"}))
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["ok"], json!(false));
        assert_eq!(payload["error"]["code"], json!("LAKE_NOT_FOUND"));
        assert_eq!(payload["error"]["meta"], json!({"lake_id": "abc"}));
        assert_eq!(payload["message"], json!("Lake not found"));
    }
}
