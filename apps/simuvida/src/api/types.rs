//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//! Device and stage records are returned in their persisted shape.

use serde::{Deserialize, Serialize};
use simuvida_core::{
    Decision, Device, DeviceCatalog, DeviceEdit, DeviceTemplate, Impact, NewStage, Stage,
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CATALOG RESPONSE
// =============================================================================

/// One generatable device type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntryJson {
    #[serde(rename = "type")]
    pub device_type: String,
    pub name: String,
    pub description: String,
    pub stages: Vec<String>,
}

impl From<&DeviceTemplate> for CatalogEntryJson {
    fn from(template: &DeviceTemplate) -> Self {
        Self {
            device_type: template.device_type.as_str().to_string(),
            name: template.info.name.to_string(),
            description: template.info.description.to_string(),
            stages: template.stages.iter().map(|s| s.name.to_string()).collect(),
        }
    }
}

/// Reference data available for auto-creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub device_types: Vec<CatalogEntryJson>,
    pub decisions: Vec<Decision>,
}

impl CatalogResponse {
    pub fn from_catalog(catalog: &DeviceCatalog) -> Self {
        Self {
            device_types: catalog.templates().iter().map(CatalogEntryJson::from).collect(),
            decisions: catalog
                .generic_decisions()
                .iter()
                .map(|d| d.to_decision())
                .collect(),
        }
    }
}

// =============================================================================
// DEVICE LIST RESPONSE
// =============================================================================

/// All stored devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceListResponse {
    pub count: usize,
    pub devices: Vec<Device>,
}

impl DeviceListResponse {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            count: devices.len(),
            devices,
        }
    }
}

// =============================================================================
// DEVICE REQUEST/RESPONSE
// =============================================================================

/// Device edit request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateDeviceRequest {
    /// Convert to the core edit payload. A null description clears it.
    pub fn to_edit(&self) -> DeviceEdit {
        DeviceEdit {
            name: self.name.clone(),
            device_type: self.device_type.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Result of a device operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub device: Option<Device>,
    pub error: Option<String>,
}

impl DeviceResponse {
    pub fn found(device: Device) -> Self {
        Self {
            success: true,
            message: None,
            device: Some(device),
            error: None,
        }
    }

    pub fn success(device: Device, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            device: Some(device),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            device: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// STAGE REQUEST/RESPONSE
// =============================================================================

/// Custom stage request, with the impact figures as flat fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStageRequest {
    pub name: String,
    #[serde(alias = "CO2")]
    pub co2: f64,
    #[serde(alias = "agua")]
    pub water: f64,
    #[serde(alias = "residuos")]
    pub waste: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateStageRequest {
    /// Convert to the core stage payload.
    pub fn to_new_stage(&self) -> NewStage {
        NewStage {
            name: self.name.clone(),
            impact: Impact::new(self.co2, self.water, self.waste),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Result of a stage operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub stage: Option<Stage>,
    pub error: Option<String>,
}

impl StageResponse {
    pub fn found(stage: Stage) -> Self {
        Self {
            success: true,
            message: None,
            stage: Some(stage),
            error: None,
        }
    }

    pub fn success(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            stage: Some(stage),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            stage: None,
            error: Some(msg.into()),
        }
    }
}
