//! # Core Type Definitions
//!
//! This module contains the record types persisted in the device document:
//! - The root `Document` and its `Device` records
//! - Life-cycle `Stage`s and mitigation `Decision`s
//! - The `Impact` triple shared by stages and decisions
//! - The fixed `DeviceType` enumeration used by the catalog
//! - Error types (`SimuvidaError`)
//!
//! ## Wire Names
//!
//! The JSON field names are part of the on-disk format and are kept exactly
//! as the document has always been written, including the Spanish keys inside
//! stages (`descripcion`, `decisiones`, `impacto`, `agua`, `residuos`).
//! Older documents that used Spanish keys at the device level are accepted
//! through serde aliases and rewritten with the current names on next save.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IMPACT
// =============================================================================

/// Environmental impact triple.
///
/// Stage impacts are absolute figures; decision impacts are deltas where a
/// negative value is an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Impact {
    /// CO2 emitted, in kilograms.
    #[serde(rename = "CO2")]
    pub co2: f64,
    /// Water used, in liters.
    #[serde(rename = "agua")]
    pub water: f64,
    /// Waste generated, in kilograms.
    #[serde(rename = "residuos")]
    pub waste: f64,
}

impl Impact {
    #[must_use]
    pub const fn new(co2: f64, water: f64, waste: f64) -> Self {
        Self { co2, water, waste }
    }

    /// True when all three figures are finite numbers.
    ///
    /// JSON has no encoding for NaN or infinity, so only finite impacts can be
    /// persisted.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.co2.is_finite() && self.water.is_finite() && self.waste.is_finite()
    }
}

// =============================================================================
// DECISION
// =============================================================================

/// A candidate mitigation action attached to a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "impacto")]
    pub impact: Impact,
}

// =============================================================================
// STAGE
// =============================================================================

/// One phase of a device's life-cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique within the owning device's stage list.
    pub id: u64,
    #[serde(alias = "nombre")]
    pub name: String,
    pub impact: Impact,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Full copies of the decisions, not references into the catalog.
    #[serde(rename = "decisiones", default)]
    pub decisions: Vec<Decision>,
}

// =============================================================================
// DEVICE
// =============================================================================

/// A tracked physical product and its life-cycle stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique within the document.
    pub id: u64,
    #[serde(alias = "nombre")]
    pub name: String,
    /// One of the catalog types for generated devices; free-form once edited.
    #[serde(rename = "type", alias = "tipo")]
    pub device_type: String,
    /// Mirrors `stages.len()`; refreshed by every stage mutation.
    #[serde(alias = "numero_etapas", default)]
    pub stage_count: usize,
    #[serde(alias = "descripcion", default)]
    pub description: String,
    #[serde(alias = "etapas", default)]
    pub stages: Vec<Stage>,
}

impl Device {
    /// Append a stage and keep `stage_count` in step.
    pub fn push_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
        self.sync_stage_count();
    }

    /// Recompute `stage_count` from the stage list.
    pub fn sync_stage_count(&mut self) {
        self.stage_count = self.stages.len();
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// The root persisted structure.
///
/// A missing `devices` key reads as an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "dispositivos", default)]
    pub devices: Vec<Device>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// DEVICE TYPE
// =============================================================================

/// The device types the catalog can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Phone,
    Laptop,
    Monitor,
    Tablet,
}

impl DeviceType {
    /// All catalog types in display order.
    pub const ALL: [Self; 4] = [Self::Phone, Self::Laptop, Self::Monitor, Self::Tablet];

    /// The persisted key for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Laptop => "laptop",
            Self::Monitor => "monitor",
            Self::Tablet => "tablet",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = SimuvidaError;

    /// Parse a type key. Keys match exactly; the legacy `telefono` key is
    /// accepted for phones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone" | "telefono" => Ok(Self::Phone),
            "laptop" => Ok(Self::Laptop),
            "monitor" => Ok(Self::Monitor),
            "tablet" => Ok(Self::Tablet),
            _ => Err(SimuvidaError::InvalidInput(format!(
                "unknown device type '{}' (expected one of: phone, laptop, monitor, tablet)",
                s
            ))),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the SimuVida system.
///
/// - Lookups report absence as `DeviceNotFound`/`StageNotFound`, never a panic
/// - Rejected input performs no mutation
/// - `CorruptStore` only surfaces from strict loads; the lenient load
///   degrades to an empty document instead
#[derive(Debug, Error)]
pub enum SimuvidaError {
    /// No device with this id exists in the document.
    #[error("Device not found: {0}")]
    DeviceNotFound(u64),

    /// The device exists but has no stage with this id.
    #[error("Stage {stage} not found on device {device}")]
    StageNotFound { device: u64, stage: u64 },

    /// Unknown device type or a field that failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The persisted document could not be parsed or failed validation.
    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl SimuvidaError {
    /// True for the not-found family of errors.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound(_) | Self::StageNotFound { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
