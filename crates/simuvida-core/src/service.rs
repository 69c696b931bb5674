//! # Device Service
//!
//! The operations callers perform on the document: list, fetch, auto-create
//! from the catalog, edit, delete and append a custom stage.
//!
//! Every operation is one load, in-memory edits, and at most one save.
//! Operations that fail (unknown id, rejected input) return before the save,
//! so the file on disk is left exactly as it was.
//!
//! The service does not lock. Two services pointed at the same file can
//! interleave their load/save pairs and the last save wins; the HTTP server
//! avoids this by owning a single service behind a mutex.

use crate::catalog::DeviceCatalog;
use crate::ids::{find_by_id, find_by_id_mut, next_id, position_by_id};
use crate::store::{JsonStore, StoreConfig};
use crate::validation::{DeviceEdit, NewStage};
use crate::{Device, SimuvidaError, Stage};
use std::sync::Arc;

/// Read-modify-write operations over the device document.
#[derive(Debug, Clone)]
pub struct DeviceService {
    store: JsonStore,
    catalog: Arc<DeviceCatalog>,
}

impl DeviceService {
    /// Create a service over an explicit store and catalog.
    #[must_use]
    pub fn new(store: JsonStore, catalog: Arc<DeviceCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Create a service from configuration, using the built-in catalog.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(JsonStore::new(config), Arc::new(DeviceCatalog::builtin()))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// The reference catalog.
    #[must_use]
    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    /// Shared handle on the reference catalog.
    #[must_use]
    pub fn shared_catalog(&self) -> Arc<DeviceCatalog> {
        Arc::clone(&self.catalog)
    }

    /// All devices, in stored order.
    pub fn list_devices(&self) -> Vec<Device> {
        self.store.load().devices
    }

    /// One device by id.
    pub fn get_device(&self, id: u64) -> Result<Device, SimuvidaError> {
        let document = self.store.load();
        find_by_id(&document.devices, id)
            .cloned()
            .ok_or(SimuvidaError::DeviceNotFound(id))
    }

    /// One stage of one device.
    pub fn get_stage(&self, device_id: u64, stage_id: u64) -> Result<Stage, SimuvidaError> {
        let device = self.get_device(device_id)?;
        find_by_id(&device.stages, stage_id)
            .cloned()
            .ok_or(SimuvidaError::StageNotFound {
                device: device_id,
                stage: stage_id,
            })
    }

    /// Generate a device of `device_type` from the catalog and persist it.
    ///
    /// Unknown types fail with `InvalidInput` before anything is written.
    pub fn create_from_catalog(&self, device_type: &str) -> Result<Device, SimuvidaError> {
        // Reject the type before touching the store.
        self.catalog.template_for(device_type)?;

        let mut document = self.store.load();
        let id = next_id(&document.devices)?;
        let device = self.catalog.build_device(device_type, id)?;

        document.devices.push(device.clone());
        self.store.save(&document)?;

        tracing::info!(
            device = device.id,
            device_type = %device.device_type,
            stages = device.stage_count,
            "Device created from catalog"
        );
        Ok(device)
    }

    /// Overwrite a device's name, type and description.
    ///
    /// Stages and `stage_count` are left untouched.
    pub fn edit_device(&self, id: u64, edit: &DeviceEdit) -> Result<Device, SimuvidaError> {
        let edit = edit.validated()?;

        let mut document = self.store.load();
        let device =
            find_by_id_mut(&mut document.devices, id).ok_or(SimuvidaError::DeviceNotFound(id))?;

        device.name = edit.name;
        device.device_type = edit.device_type;
        device.description = edit.description;
        let updated = device.clone();

        self.store.save(&document)?;

        tracing::info!(device = id, "Device updated");
        Ok(updated)
    }

    /// Remove a device and return it.
    pub fn delete_device(&self, id: u64) -> Result<Device, SimuvidaError> {
        let mut document = self.store.load();
        let index =
            position_by_id(&document.devices, id).ok_or(SimuvidaError::DeviceNotFound(id))?;

        let removed = document.devices.remove(index);
        self.store.save(&document)?;

        tracing::info!(device = id, "Device deleted");
        Ok(removed)
    }

    /// Append a custom stage with no decisions to a device.
    pub fn add_stage(&self, device_id: u64, new_stage: &NewStage) -> Result<Stage, SimuvidaError> {
        let new_stage = new_stage.validated()?;

        let mut document = self.store.load();
        let device = find_by_id_mut(&mut document.devices, device_id)
            .ok_or(SimuvidaError::DeviceNotFound(device_id))?;

        let stage = Stage {
            id: next_id(&device.stages)?,
            name: new_stage.name,
            impact: new_stage.impact,
            description: new_stage.description,
            decisions: Vec::new(),
        };
        device.push_stage(stage.clone());

        self.store.save(&document)?;

        tracing::info!(device = device_id, stage = stage.id, "Stage added");
        Ok(stage)
    }
}

// =============================================================================
// TESTS
// =============================================================================
