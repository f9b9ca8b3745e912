//! Checks against a running account server
//!
//! Requires a server at `OA_TEST_SERVER` (default http://127.0.0.1:2021).
//! To run these tests: cargo test --features live-server
#![cfg(feature = "live-server")]

use account_testkit::client::{ApiClient, ApiRequest};
use account_testkit::config::Settings;
use account_testkit::fixtures::SequenceGenerator;
use account_testkit::schema::{apply_enum_overrides, fail_schema, ok_schema};
use serde_json::{json, Value};

fn check_exist_schema(field: &str, enums: Value) -> Value {
    let mut data = json!({
        "type": "object",
        "properties": {
            "exist": {"type": "boolean"},
            field: {"type": "string"},
            "userType": {"type": "integer"}
        },
        "required": ["exist", field, "userType"]
    });
    if let (Some(props), Some(enums)) = (data["properties"].as_object_mut(), enums.as_object()) {
        apply_enum_overrides(props, enums);
    }
    ok_schema(data)
}

fn client() -> ApiClient {
    ApiClient::new(&Settings::from_env().unwrap()).unwrap()
}

#[tokio::test]
async fn test_check_exist_tel_not_exist() {
    let tel = SequenceGenerator::from_clock().next_tel();
    let schema = check_exist_schema("tel", json!({"tel": tel, "exist": false}));
    client()
        .execute(
            ApiRequest::get("/v1/account/user/check_exist/tel")
                .arg("tel", tel.as_str())
                .schema(schema),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_check_exist_username_not_exist() {
    let username = SequenceGenerator::from_clock().next_username();
    let schema = check_exist_schema("username", json!({"username": username, "exist": false}));
    client()
        .execute(
            ApiRequest::get("/v1/account/user/check_exist/username")
                .arg("username", username.as_str())
                .schema(schema),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_with_invalid_args() {
    client()
        .execute(
            ApiRequest::post("/v1/account/user/register")
                .json(json!({"tel": "", "password": ""}))
                .schema(fail_schema("ERR_ARGS_INVALID")),
        )
        .await
        .unwrap();
}
