//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert the `{success: false, error}` envelope with the given status,
/// and return the error message
pub fn assert_error_envelope(response: &TestResponse, expected: StatusCode) -> String {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();

    assert_eq!(json["success"], false, "Expected success=false: {json}");
    let error = json["error"]
        .as_str()
        .unwrap_or_else(|| panic!("Expected error string in {json}"));
    assert!(!error.is_empty(), "Error message should not be empty");
    error.to_string()
}

/// Assert a successful `/generate` response and return its JSON body
pub fn assert_sprite_response(
    response: &TestResponse,
    width: u32,
    height: u32,
) -> serde_json::Value {
    assert_ok(response);
    let json: serde_json::Value = response.json();

    assert_eq!(json["success"], true);
    assert_eq!(json["image"]["width"], width);
    assert_eq!(json["image"]["height"], height);
    assert_eq!(json["image"]["mode"], "rgba");
    assert!(json["image"]["base64"].is_string(), "Expected base64 string");
    assert!(
        json["generation_time"].as_f64().is_some_and(|t| t >= 0.0),
        "Expected non-negative generation_time, got {}",
        json["generation_time"]
    );
    json
}
