#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end tests against a gateway bound to an ephemeral port.

use std::{net::SocketAddr, sync::Arc};

use {
    serde_json::{Value, json},
    tokio::net::TcpListener,
};

use {
    voira_config::IngestConfig,
    voira_gateway::{server::build_gateway_app, state::GatewayState},
    voira_onboarding::{
        LiveOnboardingService, SessionStore, store_file::FileSessionStore,
        store_memory::InMemorySessionStore,
    },
    voira_services::{Services, ingest::IngestService},
};

const KEY: &str = "voira_onboarding_data";

async fn serve(state: GatewayState) -> SocketAddr {
    let app = build_gateway_app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_server_with(services: Services, store: Arc<dyn SessionStore>) -> SocketAddr {
    let onboarding = LiveOnboardingService::open(store, KEY).await;
    serve(GatewayState::new(services, onboarding)).await
}

async fn start_server() -> SocketAddr {
    start_server_with(Services::in_memory(), Arc::new(InMemorySessionStore::new())).await
}

async fn post(addr: SocketAddr, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn health() {
    let addr = start_server().await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ingestConfigured"], true);
}

#[tokio::test]
async fn allocate_phone_returns_two_numbers() {
    let addr = start_server().await;
    let (status, body) = post(addr, "/api/allocate-phone", json!({ "areaCode": "212" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["country"], "US");
    assert!(body["inboundNumber"].as_str().unwrap().starts_with("+1 (212) "));
    assert!(body["outboundNumber"].as_str().unwrap().starts_with("+1 (212) "));
    assert_eq!(body["configuration"]["callForwarding"], "enabled");
}

#[tokio::test]
async fn allocate_phone_accepts_empty_body() {
    let addr = start_server().await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/allocate-phone"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn scrape_website_validates_url() {
    let addr = start_server().await;

    let (status, body) = post(addr, "/api/scrape-website", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "URL is required");

    let (status, body) = post(addr, "/api/scrape-website", json!({ "url": "medco" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid URL format");

    let (status, body) = post(
        addr,
        "/api/scrape-website",
        json!({ "url": "https://medco.example" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Website scraped successfully");
    assert_eq!(body["data"]["practiceName"], "Medco");
    assert_eq!(body["data"]["hours"], "Mon-Fri 8AM-6PM, Sat 9AM-2PM");
}

#[tokio::test]
async fn trigger_call() {
    let addr = start_server().await;

    let (status, body) = post(addr, "/api/trigger-call", json!({ "agentType": "claims" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Phone number is required");

    let (status, body) = post(
        addr,
        "/api/trigger-call",
        json!({ "phoneNumber": "+49 30 1234567" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["agentType"], "claims");
    assert_eq!(body["phoneNumber"], "+49 30 1234567");
    assert!(body["callId"].as_str().unwrap().starts_with("call_"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let addr = start_server().await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/trigger-call"))
        .header("content-type", "application/json")
        .body("{phoneNumber:")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn ingest_success_and_partial() {
    let addr = start_server().await;

    let (status, body) = post(
        addr,
        "/api/ingest",
        json!({
            "tenantId": "medco",
            "documents": [
                { "filename": "faq.md", "content": "Walk-ins welcome." },
                { "filename": "logo.png", "content": "..." },
            ],
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["inserted"], 1);
    assert_eq!(body["skipped"], 1);
    assert_eq!(body["collectionName"], "Documents_medco");

    let (status, body) = post(
        addr,
        "/api/ingest",
        json!({
            "tenantId": "medco",
            "documents": [
                { "filename": "a.txt", "content": "ok" },
                { "filename": "b.txt", "content": "" },
            ],
        }),
    )
    .await;
    assert_eq!(status, 207);
    assert_eq!(body["inserted"], 1);
    assert_eq!(body["total"], 2);
    assert!(body["errors"]["1"].is_string());
}

#[tokio::test]
async fn ingest_rejects_bad_requests() {
    let addr = start_server().await;

    let (status, body) = post(addr, "/api/ingest", json!({ "documents": [] })).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    let (status, body) = post(
        addr,
        "/api/ingest",
        json!({ "tenantId": "demo", "documents": [{ "filename": "a.pdf", "content": "x" }] }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains(".txt and .md"));

    let (status, body) = post(
        addr,
        "/api/ingest",
        json!({ "tenantId": "x/../../meta", "documents": [{ "filename": "a.txt", "content": "x" }] }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid tenantId"));
}

#[tokio::test]
async fn ingest_without_configuration_is_server_error() {
    let services = Services {
        ingest: Arc::new(IngestService::from_config(&IngestConfig::default())),
        ..Services::in_memory()
    };
    let addr = start_server_with(services, Arc::new(InMemorySessionStore::new())).await;
    let (status, body) = post(
        addr,
        "/api/ingest",
        json!({ "tenantId": "demo", "documents": [{ "filename": "a.txt", "content": "x" }] }),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(
        body["error"],
        "Server configuration error. Please contact administrator."
    );
}

#[tokio::test]
async fn onboarding_round_trip() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    let view: Value = client
        .get(format!("http://{addr}/api/onboarding"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["step"], 1);

    let (status, view) = post(addr, "/api/onboarding/next", json!({ "payload": null })).await;
    assert_eq!(status, 200);
    assert_eq!(view["name"], "details");

    let (status, body) = post(addr, "/api/onboarding/next", json!({ "payload": null })).await;
    assert_eq!(status, 400, "{body}");

    let (status, _) = post(
        addr,
        "/api/onboarding/next",
        json!({ "step": "phone", "payload": { "inboundNumber": "1", "outboundNumber": "2" } }),
    )
    .await;
    assert_eq!(status, 409);

    let (status, view) = post(
        addr,
        "/api/onboarding/next",
        json!({ "payload": { "practiceName": "Medco", "businessType": "Dental Practice", "location": "Berlin" } }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(view["step"], 3);
    assert_eq!(view["tenantId"], "medco");

    let (_, view) = post(addr, "/api/onboarding/back", json!({})).await;
    assert_eq!(view["step"], 2);
    assert_eq!(view["prefill"]["practiceName"], "Medco");

    let view: Value = client
        .delete(format!("http://{addr}/api/onboarding"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["step"], 1);
    assert_eq!(view["data"], json!({}));
}

#[tokio::test]
async fn onboarding_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = || -> Arc<dyn SessionStore> { Arc::new(FileSessionStore::new(dir.path())) };

    let addr = start_server_with(Services::in_memory(), store()).await;
    post(addr, "/api/onboarding/next", json!({ "payload": null })).await;
    assert!(dir.path().join(format!("{KEY}.json")).exists());

    let addr = start_server_with(Services::in_memory(), store()).await;
    let view: Value = reqwest::get(format!("http://{addr}/api/onboarding"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["step"], 2);
    assert_eq!(view["data"], json!({ "website": null }));
}
