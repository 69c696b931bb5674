//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every handler that touches the document holds the service lock for the
//! whole operation, so the load-modify-save sequences of concurrent requests
//! never interleave.

use super::{
    AppState,
    types::{
        CatalogResponse, CreateStageRequest, DeviceListResponse, DeviceResponse, HealthResponse,
        StageResponse, UpdateDeviceRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use simuvida_core::SimuvidaError;

/// HTTP status for a core error.
fn status_for(error: &SimuvidaError) -> StatusCode {
    if error.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    match error {
        SimuvidaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log server-side failures; client errors are expected traffic.
fn log_failure(operation: &str, error: &SimuvidaError) -> StatusCode {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(operation, error = %error, "Request failed");
    } else {
        tracing::debug!(operation, error = %error, "Request rejected");
    }
    status
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATALOG HANDLER
// =============================================================================

/// Device types and generic decisions available for auto-creation.
pub async fn catalog_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CatalogResponse::from_catalog(&state.catalog)),
    )
}

// =============================================================================
// DEVICE HANDLERS
// =============================================================================

/// List all devices.
pub async fn list_devices_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service.lock().await;
    (
        StatusCode::OK,
        Json(DeviceListResponse::new(service.list_devices())),
    )
}

/// Fetch one device.
pub async fn get_device_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.get_device(id) {
        Ok(device) => (StatusCode::OK, Json(DeviceResponse::found(device))),
        Err(e) => (
            log_failure("get_device", &e),
            Json(DeviceResponse::error(e.to_string())),
        ),
    }
}

/// Generate a device of the given type from the catalog.
pub async fn create_device_handler(
    State(state): State<AppState>,
    Path(device_type): Path<String>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.create_from_catalog(&device_type) {
        Ok(device) => {
            let message = format!(
                "Device \"{}\" created with {} life-cycle stages.",
                device.name, device.stage_count
            );
            (
                StatusCode::CREATED,
                Json(DeviceResponse::success(device, message)),
            )
        }
        Err(e) => (
            log_failure("create_device", &e),
            Json(DeviceResponse::error(e.to_string())),
        ),
    }
}

/// Edit a device's name, type and description.
pub async fn update_device_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateDeviceRequest>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.edit_device(id, &request.to_edit()) {
        Ok(device) => (
            StatusCode::OK,
            Json(DeviceResponse::success(device, "Device updated.")),
        ),
        Err(e) => (
            log_failure("update_device", &e),
            Json(DeviceResponse::error(e.to_string())),
        ),
    }
}

/// Delete a device.
pub async fn delete_device_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.delete_device(id) {
        Ok(device) => (
            StatusCode::OK,
            Json(DeviceResponse::success(device, "Device deleted.")),
        ),
        Err(e) => (
            log_failure("delete_device", &e),
            Json(DeviceResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// STAGE HANDLERS
// =============================================================================

/// Append a custom stage to a device.
pub async fn create_stage_handler(
    State(state): State<AppState>,
    Path(device_id): Path<u64>,
    Json(request): Json<CreateStageRequest>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.add_stage(device_id, &request.to_new_stage()) {
        Ok(stage) => (
            StatusCode::CREATED,
            Json(StageResponse::success(stage, "Stage created.")),
        ),
        Err(e) => (
            log_failure("create_stage", &e),
            Json(StageResponse::error(e.to_string())),
        ),
    }
}

/// Fetch one stage of a device.
pub async fn get_stage_handler(
    State(state): State<AppState>,
    Path((device_id, stage_id)): Path<(u64, u64)>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.get_stage(device_id, stage_id) {
        Ok(stage) => (StatusCode::OK, Json(StageResponse::found(stage))),
        Err(e) => (
            log_failure("get_stage", &e),
            Json(StageResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================
