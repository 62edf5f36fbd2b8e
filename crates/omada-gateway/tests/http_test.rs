#![allow(clippy::unwrap_used)]
// Status mapping through a real listener, with wiremock standing in for the controller.

use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use omada_api::{ControllerCredentials, OmadaClient};
use omada_core::SsidUpdatePipeline;
use omada_gateway::{AppState, serve};

// ── Helpers ─────────────────────────────────────────────────────────

const SITE: &str = "/c1/api/v2/sites/s1";

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "errorCode": 0,
        "msg": "Success.",
        "result": result,
    }))
}

async fn spawn_gateway(controller: &MockServer, budget: Duration) -> String {
    let credentials = ControllerCredentials::new("admin", SecretString::from("pw".to_owned()));
    let client = OmadaClient::with_client(
        reqwest::Client::new(),
        Url::parse(&controller.uri()).unwrap(),
        credentials,
        1024 * 1024,
    );
    let pipeline = SsidUpdatePipeline::new(client).with_budget(budget);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(
        listener,
        AppState::new(pipeline),
        std::future::pending(),
    ));
    format!("http://{addr}")
}

async fn mount_get(server: &MockServer, at: &str, result: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ok(result))
        .mount(server)
        .await;
}

/// Everything up to and including the SSID list.
async fn mount_controller(server: &MockServer) {
    mount_get(server, "/api/info", json!({ "omadacId": "c1" })).await;
    Mock::given(method("POST"))
        .and(path("/c1/api/v2/login"))
        .respond_with(ok(json!({ "token": "tok" })).insert_header("Set-Cookie", "TPOMADA_SESSIONID=s"))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/c1/api/v2/logout"))
        .respond_with(ok(Value::Null))
        .mount(server)
        .await;
    mount_get(server, "/c1/api/v2/sites", json!([{ "id": "s1" }])).await;
    mount_get(server, &format!("{SITE}/setting/wlans"), json!([{ "id": "w1" }])).await;
    mount_get(
        server,
        &format!("{SITE}/setting/wlans/w1/ssids"),
        json!([{
            "id": "ssid-home", "name": "home",
            "rateLimit": { "upLimitEnable": true, "upLimit": 10, "upLimitType": 1, "downLimitEnable": false }
        }]),
    )
    .await;
    mount_get(
        server,
        &format!("{SITE}/setting/profiles/timeranges"),
        json!([{
            "id": "tr1", "name": "Night and Day", "dayMode": 0,
            "timeList": [{ "dayType": 0, "startHour": 0, "startMin": 0, "endHour": 24, "endMin": 0 }]
        }]),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{SITE}/setting/wlans/w1/ssids/home")))
        .respond_with(ok(Value::Null))
        .mount(server)
        .await;
    mount_get(
        server,
        &format!("{SITE}/setting/firewall/urlfilters"),
        json!([{
            "id": "f1", "name": "ads", "status": true, "policy": 0,
            "sourceType": 2, "sourceIds": ["ssid-home"], "urls": ["a.com"]
        }]),
    )
    .await;
}

async fn post_json(url: &str, body: &Value) -> (StatusCode, Value) {
    let resp = reqwest::Client::new().post(url).json(body).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_healthz() {
    let controller = MockServer::start().await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({ "data": { "status": "ok" } })
    );
}

#[tokio::test]
async fn test_update_wifi_success() {
    let controller = MockServer::start().await;
    mount_controller(&controller).await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let (status, body) = post_json(
        &format!("{base}/api/v1/networks/wifis/home"),
        &json!({ "uploadRateLimit": 10240 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": { "updated": true, "urlFilters": [
            { "name": "ads", "bypassFilter": false, "urls": ["a.com"] }
        ] } })
    );
}

#[tokio::test]
async fn test_read_wifi() {
    let controller = MockServer::start().await;
    mount_controller(&controller).await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/api/v1/networks/wifis/home"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({ "data": {
            "ssid": "home",
            "uploadRateLimit": 10240,
            "downloadRateLimit": -1,
            "urlFilters": [{ "name": "ads", "bypassFilter": false, "urls": ["a.com"] }]
        } })
    );
}

#[tokio::test]
async fn test_unknown_ssid_is_404() {
    let controller = MockServer::start().await;
    mount_controller(&controller).await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let (status, body) = post_json(&format!("{base}/api/v1/networks/wifis/office"), &json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["message"], "SSID not found: office");
}

#[tokio::test]
async fn test_missing_ssid_is_400() {
    let controller = MockServer::start().await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let (status, body) = post_json(&format!("{base}/api/v1/networks/wifis/"), &json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
    assert!(controller.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let controller = MockServer::start().await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/v1/networks/wifis/home"))
        .header("Content-Type", "application/json")
        .body("{ \"uploadRateLimit\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], 400);
    assert!(controller.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_controller_rejection_is_502() {
    let controller = MockServer::start().await;
    mount_get(&controller, "/api/info", json!({ "omadacId": "c1" })).await;
    Mock::given(method("POST"))
        .and(path("/c1/api/v2/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": -30109,
            "msg": "Invalid username or password.",
        })))
        .mount(&controller)
        .await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let (status, body) = post_json(&format!("{base}/api/v1/networks/wifis/home"), &json!({})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], 502);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Invalid username or password.")
    );
}

#[tokio::test]
async fn test_exhausted_budget_is_504() {
    let controller = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ok(json!({ "omadacId": "c1" })).set_delay(Duration::from_secs(5)))
        .mount(&controller)
        .await;
    let base = spawn_gateway(&controller, Duration::from_millis(100)).await;

    let (status, body) = post_json(&format!("{base}/api/v1/networks/wifis/home"), &json!({})).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["code"], 504);
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let controller = MockServer::start().await;
    let base = spawn_gateway(&controller, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/api/v2/nothing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], 404);
}
