//! # Lifecycle Behaviour Tests
//!
//! End-to-end checks of the store, the catalog and the service against a real
//! document file in a scratch directory.
//!
//! ## Tiers
//! - L0: Store tolerance
//! - L1: Auto-creation
//! - L2: Deletion
//! - L3: Editing and custom stages

use simuvida_core::{
    DeviceEdit, DeviceService, Document, Impact, JsonStore, NewStage, SimuvidaError, StoreConfig,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn scratch() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("devices.json");
    (dir, path)
}

fn service_at(path: &PathBuf) -> DeviceService {
    DeviceService::from_config(&StoreConfig {
        data_file: path.clone(),
    })
}

// =============================================================================
// TIER L0: STORE TOLERANCE
// =============================================================================

mod l0_store_tolerance {
    use super::*;

    /// L0.1: A missing file reads as an empty document.
    #[test]
    fn missing_file_is_empty() {
        let (_dir, path) = scratch();
        assert_eq!(JsonStore::open(&path).load(), Document::new());
    }

    /// L0.2: A corrupt file reads as an empty document.
    #[test]
    fn corrupt_file_is_empty() {
        let (_dir, path) = scratch();
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "[1, 2, 3]").expect("write");

        let store = JsonStore::open(&path);
        assert!(store.load().devices.is_empty());
        assert!(matches!(store.try_load(), Err(SimuvidaError::CorruptStore(_))));
    }

    /// L0.3: A service over a corrupt file lists nothing and can still write.
    #[test]
    fn service_recovers_from_corrupt_file() {
        let (_dir, path) = scratch();
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "\u{0}\u{1}garbage").expect("write");

        let svc = service_at(&path);
        assert!(svc.list_devices().is_empty());
        let device = svc.create_from_catalog("tablet").expect("create");
        assert_eq!(device.id, 1);
        assert!(JsonStore::open(&path).try_load().is_ok());
    }
}

// =============================================================================
// TIER L1: AUTO-CREATION
// =============================================================================

mod l1_auto_creation {
    use super::*;

    /// L1.1: Laptops get five stages with ids 1..5 and the decision cycle.
    #[test]
    fn laptop_shape() {
        let (_dir, path) = scratch();
        let device = service_at(&path).create_from_catalog("laptop").expect("laptop");

        assert_eq!(device.stage_count, 5);
        assert_eq!(device.stages.len(), 5);
        let ids: Vec<u64> = device.stages.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let counts: Vec<usize> = device.stages.iter().map(|s| s.decisions.len()).collect();
        assert_eq!(counts, vec![2, 3, 4, 2, 3]);
    }

    /// L1.2: The created device is what gets persisted.
    #[test]
    fn created_device_is_persisted() {
        let (_dir, path) = scratch();
        let device = service_at(&path).create_from_catalog("phone").expect("phone");

        let stored = JsonStore::open(&path).try_load().expect("load");
        assert_eq!(stored.devices, vec![device]);
    }

    /// L1.3: Unknown types are rejected and the store is not touched.
    #[test]
    fn unknown_type_rejected_without_mutation() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        svc.create_from_catalog("monitor").expect("seed");
        let before = std::fs::read(&path).expect("read");

        let result = svc.create_from_catalog("printer");

        assert!(matches!(result, Err(SimuvidaError::InvalidInput(_))));
        assert_eq!(std::fs::read(&path).expect("read"), before);
    }

    /// L1.4: Unknown types on an empty store do not create the file.
    #[test]
    fn unknown_type_on_fresh_store_writes_nothing() {
        let (_dir, path) = scratch();
        assert!(service_at(&path).create_from_catalog("printer").is_err());
        assert!(!path.exists());
    }
}

// =============================================================================
// TIER L2: DELETION
// =============================================================================

mod l2_deletion {
    use super::*;

    /// L2.1: Deleting an absent id reports NotFound and changes nothing.
    #[test]
    fn delete_absent_is_not_found() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        svc.create_from_catalog("phone").expect("seed");
        let before = std::fs::read(&path).expect("read");

        let result = svc.delete_device(99);

        assert!(matches!(result, Err(SimuvidaError::DeviceNotFound(99))));
        assert_eq!(std::fs::read(&path).expect("read"), before);
    }

    /// L2.2: Deleting removes exactly the addressed device.
    #[test]
    fn delete_removes_only_target() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        for ty in ["phone", "laptop", "monitor"] {
            svc.create_from_catalog(ty).expect("seed");
        }

        let removed = svc.delete_device(2).expect("delete");

        assert_eq!(removed.device_type, "laptop");
        let ids: Vec<u64> = svc.list_devices().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}

// =============================================================================
// TIER L3: EDITING AND CUSTOM STAGES
// =============================================================================

mod l3_editing {
    use super::*;

    /// L3.1: Editing persists name, type and description; stages stay.
    #[test]
    fn edit_touches_only_descriptive_fields() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        let original = svc.create_from_catalog("laptop").expect("seed");

        let edit = DeviceEdit {
            name: "Office laptop".to_string(),
            device_type: "workstation".to_string(),
            description: "Shared by the design team".to_string(),
        };
        svc.edit_device(original.id, &edit).expect("edit");

        let stored = svc.get_device(original.id).expect("get");
        assert_eq!(stored.name, "Office laptop");
        assert_eq!(stored.device_type, "workstation");
        assert_eq!(stored.description, "Shared by the design team");
        assert_eq!(stored.stages, original.stages);
        assert_eq!(stored.stage_count, original.stage_count);
    }

    /// L3.1b: Edited fields are stored exactly as submitted.
    #[test]
    fn edit_stores_submitted_text_verbatim() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        let original = svc.create_from_catalog("tablet").expect("seed");

        let edit = DeviceEdit {
            name: " Kitchen tablet ".to_string(),
            device_type: "tablet".to_string(),
            description: "  Recipes\n".to_string(),
        };
        svc.edit_device(original.id, &edit).expect("edit");

        let stored = JsonStore::open(&path).try_load().expect("load");
        assert_eq!(stored.devices[0].name, " Kitchen tablet ");
        assert_eq!(stored.devices[0].description, "  Recipes\n");
    }

    /// L3.2: Invalid edits and absent ids leave the file untouched.
    #[test]
    fn rejected_edit_changes_nothing() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        svc.create_from_catalog("tablet").expect("seed");
        let before = std::fs::read(&path).expect("read");

        let bad = DeviceEdit {
            name: "x".to_string(),
            device_type: "tablet".to_string(),
            description: String::new(),
        };
        assert!(matches!(
            svc.edit_device(1, &bad),
            Err(SimuvidaError::InvalidInput(_))
        ));

        let good = DeviceEdit {
            name: "Kitchen tablet".to_string(),
            ..bad
        };
        assert!(matches!(
            svc.edit_device(7, &good),
            Err(SimuvidaError::DeviceNotFound(7))
        ));

        assert_eq!(std::fs::read(&path).expect("read"), before);
    }

    /// L3.3: Custom stages get the next id and keep stage_count in step.
    #[test]
    fn custom_stage_keeps_invariant() {
        let (_dir, path) = scratch();
        let svc = service_at(&path);
        let device = svc.create_from_catalog("phone").expect("seed");

        for name in ["Repair", "Second life"] {
            svc.add_stage(
                device.id,
                &NewStage {
                    name: name.to_string(),
                    impact: Impact::new(1.0, 10.0, 0.1),
                    description: String::new(),
                },
            )
            .expect("stage");
        }

        let stored = svc.get_device(device.id).expect("get");
        assert_eq!(stored.stage_count, stored.stages.len());
        assert_eq!(stored.stages.last().map(|s| s.id), Some(7));
    }
}
