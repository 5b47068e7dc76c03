//! Shared fixtures for the cross-crate scenario tests.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session id handed out by [`mount_device_session`]
pub const SESSION_ID: &str = "scenario-session";

/// W3C element reference key
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Config file with both tables pointing at mock servers
pub fn config_toml(device_url: &str, api_url: &str) -> String {
    format!(
        r#"
[device]
server_url = "{device_url}"
device_name = "Pixel_7"
app_package = "com.monefy.app.lite"
app_activity = "com.monefy.activities.main.MainActivity_"

[api]
base_uri = "{api_url}"
api_key = "special-key"
"#
    )
}

/// Pet-store error body as the service returns it
pub fn error_body(code: i64, message: &str) -> Value {
    json!({ "code": code, "type": "error", "message": message })
}

/// Mount session create, implicit-wait and delete endpoints
pub async fn mount_device_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": SESSION_ID, "capabilities": {} }
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/session/{SESSION_ID}/timeouts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/session/{SESSION_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(server)
        .await;
}

/// W3C success payload
pub fn w3c_value(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "value": value }))
}
