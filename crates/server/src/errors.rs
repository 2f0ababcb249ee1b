use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// JSON error body with an attached status code, for handlers that need more
/// than a bare `StatusCode`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    error: String,
    detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => serde_json::json!({"error": self.error, "detail": detail}),
            None => serde_json::json!({"error": self.error}),
        };
        (self.status, Json(body)).into_response()
    }
}
