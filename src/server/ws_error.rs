//! Centralized helpers for WebSocket and HTTP error responses.
//!
//! Every error carries a stable code, a human-readable message and an optional
//! JSON context.
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::{json, Value};

fn error_body(code: &str, message: &str, context: Option<Value>) -> Value {
    json!({
        "code": code,
        "message": message,
        "context": context.unwrap_or(Value::Null),
    })
}

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_COMMAND").
/// - `message`: Human-readable error message (in English).
/// - `context`: Optional context (e.g. game_id).
pub fn ws_error_message(code: &str, message: &str, context: Option<Value>) -> String {
    json!({ "action": "Error", "data": error_body(code, message, context) }).to_string()
}

/// Returns an HTTP error response with a JSON body.
pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<Value>,
    status: StatusCode,
) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": error_body(code, message, context) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_error_is_tagged_like_other_messages() {
        let text = ws_error_message("INVALID_COMMAND", "Invalid \"command\"", None);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["action"], "Error");
        assert_eq!(value["data"]["code"], "INVALID_COMMAND");
        assert_eq!(value["data"]["message"], "Invalid \"command\"");
        assert!(value["data"]["context"].is_null());
    }

    #[test]
    fn test_http_error_keeps_status() {
        let context = Some(json!({ "x": 1 }));
        let response = http_error_response("NOPE", "no", context, StatusCode::CONFLICT);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
