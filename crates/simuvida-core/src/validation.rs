//! # Input Validation
//!
//! Field limits applied to user-submitted edits before any mutation.
//! Lengths are counted in characters. A value that is only whitespace counts
//! as empty; otherwise the value is checked and stored exactly as submitted.

use crate::{Impact, SimuvidaError};
use serde::{Deserialize, Serialize};

/// Minimum length of device and stage names.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum length of device names, stage names and device types.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

// =============================================================================
// EDIT PAYLOADS
// =============================================================================

/// Manual edit of a device's descriptive fields.
///
/// `device_type` is free-form: an edited device may leave the catalog types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEdit {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub description: String,
}

impl DeviceEdit {
    /// Check limits and return the edit unchanged.
    pub fn validated(&self) -> Result<Self, SimuvidaError> {
        check_length("name", &self.name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
        check_length("type", &self.device_type, 1, MAX_NAME_LENGTH)?;
        check_length("description", &self.description, 0, MAX_DESCRIPTION_LENGTH)?;
        Ok(self.clone())
    }
}

/// A custom stage appended to an existing device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStage {
    pub name: String,
    pub impact: Impact,
    #[serde(default)]
    pub description: String,
}

impl NewStage {
    /// Check limits and return the stage unchanged.
    pub fn validated(&self) -> Result<Self, SimuvidaError> {
        if !self.impact.is_finite() {
            return Err(SimuvidaError::InvalidInput(
                "impact values must be finite numbers".to_string(),
            ));
        }
        check_length("name", &self.name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
        check_length("description", &self.description, 0, MAX_DESCRIPTION_LENGTH)?;
        Ok(self.clone())
    }
}

/// The minimum applies to the trimmed value, the maximum to the value as stored.
fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), SimuvidaError> {
    if value.trim().chars().count() < min {
        return Err(SimuvidaError::InvalidInput(if min <= 1 {
            format!("{} is required", field)
        } else {
            format!("{} must be at least {} characters", field, min)
        }));
    }
    let len = value.chars().count();
    if len > max {
        return Err(SimuvidaError::InvalidInput(format!(
            "{} must be at most {} characters (got {})",
            field, max, len
        )));
    }
    Ok(())
}
