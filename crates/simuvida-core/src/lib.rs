//! # simuvida-core
//!
//! Environmental life-cycle records for electronic devices - THE LOGIC.
//!
//! This crate owns everything below the HTTP and CLI surfaces:
//! - `types`: the persisted records and the error type
//! - `store`: whole-document JSON persistence
//! - `ids`: id allocation and lookup within a collection
//! - `catalog`: fixed reference data and device auto-creation
//! - `validation`: field limits for manual edits
//! - `service`: the read-modify-write operations callers use
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - No global mutable state: the store path and the catalog are handed to
//!   components when they are constructed
//! - No locking: a single writer per document file is assumed

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod ids;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Decision, Device, DeviceType, Document, Impact, SimuvidaError, Stage};

// =============================================================================
// RE-EXPORTS: Components
// =============================================================================

pub use catalog::{
    DecisionTemplate, DeviceCatalog, DeviceInfo, DeviceTemplate, GENERIC_DECISIONS, StageTemplate,
};
pub use ids::{Identified, find_by_id, find_by_id_mut, next_id, position_by_id};
pub use service::DeviceService;
pub use store::{JsonStore, StoreConfig};
pub use validation::{DeviceEdit, NewStage};
