//! Success response helpers. Records are sent bare, without an envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn success_one<T: Serialize>(status: StatusCode, data: T) -> (StatusCode, Json<T>) {
    (status, Json(data))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Vec<T>>) {
    (StatusCode::OK, Json(data))
}

pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub fn error_body(code: &str, message: &str, details: Option<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}
