//! Integration tests for the SimuVida HTTP API.
//!
//! Uses axum-test to exercise the router without binding a real socket. Each
//! server gets its own document in a temporary directory.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::json;
use simuvida::api::{
    AppState, CatalogResponse, DeviceListResponse, DeviceResponse, HealthResponse, StageResponse,
    create_router,
};
use simuvida_core::{DeviceService, JsonStore, StoreConfig};
use std::sync::Mutex;
use tempfile::TempDir;

/// Mutex to serialize tests since some of them modify env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Holds the env mutex and the temporary data directory for one test.
struct TestGuard {
    dir: TempDir,
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl TestGuard {
    fn data_file(&self) -> std::path::PathBuf {
        self.dir.path().join("devices.json")
    }
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
        unsafe {
            std::env::remove_var("SIMUVIDA_API_KEY");
            std::env::remove_var("SIMUVIDA_RATE_LIMIT");
        }
    }
}

fn build_server(dir: &TempDir) -> TestServer {
    let config = StoreConfig {
        data_file: dir.path().join("devices.json"),
    };
    let state = AppState::new(DeviceService::from_config(&config));
    TestServer::new(create_router(state)).unwrap()
}

/// Create a test server over an empty temporary document.
/// Returns a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::remove_var("SIMUVIDA_API_KEY");
        std::env::set_var("SIMUVIDA_RATE_LIMIT", "0");
    }
    let dir = tempfile::tempdir().unwrap();
    let server = build_server(&dir);
    (server, TestGuard { dir, _guard: guard })
}

/// Create a test server with authentication enabled.
fn create_auth_test_server(api_key: &str) -> (TestServer, TestGuard) {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::set_var("SIMUVIDA_API_KEY", api_key);
        std::env::set_var("SIMUVIDA_RATE_LIMIT", "0");
    }
    let dir = tempfile::tempdir().unwrap();
    let server = build_server(&dir);
    (server, TestGuard { dir, _guard: guard })
}

fn stage_lengths(device: &simuvida_core::Device) -> Vec<usize> {
    device.stages.iter().map(|s| s.decisions.len()).collect()
}

// =============================================================================
// HEALTH / CATALOG ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_catalog_lists_types_and_decisions() {
    let (server, _guard) = create_test_server();

    let response = server.get("/catalog").await;

    response.assert_status_ok();
    let catalog: CatalogResponse = response.json();
    let types: Vec<&str> = catalog
        .device_types
        .iter()
        .map(|t| t.device_type.as_str())
        .collect();
    assert_eq!(types, vec!["phone", "laptop", "monitor", "tablet"]);
    assert_eq!(catalog.decisions.len(), 4);
    assert_eq!(catalog.device_types[1].stages.len(), 5);
}

// =============================================================================
// DEVICE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_list_devices_empty() {
    let (server, guard) = create_test_server();

    let response = server.get("/devices").await;

    response.assert_status_ok();
    let list: DeviceListResponse = response.json();
    assert_eq!(list.count, 0);
    assert!(list.devices.is_empty());
    // Reads never create the document.
    assert!(!guard.data_file().exists());
}

#[tokio::test]
async fn test_create_laptop_from_catalog() {
    let (server, guard) = create_test_server();

    let response = server.post("/devices/auto/laptop").await;

    assert_eq!(response.status_code().as_u16(), 201);
    let created: DeviceResponse = response.json();
    assert!(created.success);
    let device = created.device.unwrap();
    assert_eq!(device.id, 1);
    assert_eq!(device.device_type, "laptop");
    assert_eq!(device.stage_count, 5);
    assert_eq!(stage_lengths(&device), vec![2, 3, 4, 2, 3]);
    assert!(created.message.unwrap().contains("5 life-cycle stages"));

    let stored = JsonStore::open(guard.data_file()).try_load().unwrap();
    assert_eq!(stored.devices, vec![device]);
}

#[tokio::test]
async fn test_create_unknown_type_rejected() {
    let (server, guard) = create_test_server();

    let response = server.post("/devices/auto/printer").await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body: DeviceResponse = response.json();
    assert!(!body.success);
    assert!(body.device.is_none());
    assert!(body.error.unwrap().contains("printer"));
    assert!(!guard.data_file().exists());
}

#[tokio::test]
async fn test_ids_increase_across_creations() {
    let (server, _guard) = create_test_server();

    server.post("/devices/auto/phone").await;
    server.post("/devices/auto/tablet").await;

    let list: DeviceListResponse = server.get("/devices").await.json();
    let ids: Vec<u64> = list.devices.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_get_device() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/monitor").await;

    let response = server.get("/devices/1").await;
    response.assert_status_ok();
    let body: DeviceResponse = response.json();
    assert_eq!(body.device.unwrap().device_type, "monitor");

    let missing = server.get("/devices/99").await;
    assert_eq!(missing.status_code().as_u16(), 404);
    let body: DeviceResponse = missing.json();
    assert!(!body.success);
}

#[tokio::test]
async fn test_update_device() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/phone").await;

    let response = server
        .put("/devices/1")
        .json(&json!({
            "name": "Work phone",
            "type": "phone",
            "description": "Company issued"
        }))
        .await;

    response.assert_status_ok();
    let body: DeviceResponse = response.json();
    let device = body.device.unwrap();
    assert_eq!(device.name, "Work phone");
    assert_eq!(device.description, "Company issued");
    assert_eq!(device.stage_count, 5, "stages are left untouched");
}

#[tokio::test]
async fn test_update_device_validation() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/phone").await;

    let response = server
        .put("/devices/1")
        .json(&json!({ "name": "x", "type": "phone" }))
        .await;
    assert_eq!(response.status_code().as_u16(), 400);

    let missing = server
        .put("/devices/7")
        .json(&json!({ "name": "Valid name", "type": "phone" }))
        .await;
    assert_eq!(missing.status_code().as_u16(), 404);

    let device: DeviceResponse = server.get("/devices/1").await.json();
    assert_eq!(device.device.unwrap().name, "Smartphone");
}

#[tokio::test]
async fn test_delete_device() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/laptop").await;
    server.post("/devices/auto/tablet").await;

    let response = server.delete("/devices/1").await;
    response.assert_status_ok();

    let again = server.delete("/devices/1").await;
    assert_eq!(again.status_code().as_u16(), 404);

    let list: DeviceListResponse = server.get("/devices").await.json();
    assert_eq!(list.count, 1);
    assert_eq!(list.devices[0].id, 2);
}

// =============================================================================
// STAGE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_create_and_get_stage() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/tablet").await;

    let response = server
        .post("/devices/1/stages")
        .json(&json!({
            "name": "Refurbishment",
            "CO2": 4.5,
            "agua": 30.0,
            "residuos": 0.2,
            "description": "Battery swap"
        }))
        .await;

    assert_eq!(response.status_code().as_u16(), 201);
    let created: StageResponse = response.json();
    let stage = created.stage.unwrap();
    assert_eq!(stage.id, 6);
    assert!(stage.decisions.is_empty());
    assert_eq!(stage.impact.co2, 4.5);

    let fetched: StageResponse = server.get("/devices/1/stages/6").await.json();
    assert_eq!(fetched.stage.unwrap(), stage);

    let device: DeviceResponse = server.get("/devices/1").await.json();
    assert_eq!(device.device.unwrap().stage_count, 6);
}

#[tokio::test]
async fn test_create_stage_errors() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/phone").await;

    let blank = server
        .post("/devices/1/stages")
        .json(&json!({ "name": " ", "co2": 1.0, "water": 1.0, "waste": 1.0 }))
        .await;
    assert_eq!(blank.status_code().as_u16(), 400);

    let missing = server
        .post("/devices/42/stages")
        .json(&json!({ "name": "Repair", "co2": 1.0, "water": 1.0, "waste": 1.0 }))
        .await;
    assert_eq!(missing.status_code().as_u16(), 404);

    let stage = server.get("/devices/1/stages/99").await;
    assert_eq!(stage.status_code().as_u16(), 404);
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let (server, _guard) = create_test_server();
    server.post("/devices/auto/phone").await;

    let response = server
        .post("/devices/1/stages")
        .json(&json!({ "name": "Repair" }))
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let (server, _guard) = create_auth_test_server(api_key);

    let response = server
        .get("/devices")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let (server, _guard) = create_auth_test_server("correct-key");

    let response = server
        .post("/devices/auto/laptop")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(
        response.status_code().as_u16(),
        401,
        "Invalid token should return 401 Unauthorized"
    );
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let (server, guard) = create_auth_test_server("required-key");

    let response = server.post("/devices/auto/laptop").await;

    assert_eq!(response.status_code().as_u16(), 401);
    assert!(!guard.data_file().exists());
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let (server, _guard) = create_auth_test_server("secret-key-for-bypass-test");

    let response = server.get("/health").await;

    response.assert_status_ok();
}
