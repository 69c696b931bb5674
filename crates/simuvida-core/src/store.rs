//! # Document Store
//!
//! Whole-document persistence for the device records.
//!
//! The document is one pretty-printed JSON file. Every call reads or writes the
//! entire file; nothing is cached between calls.
//!
//! ## Load Policy
//!
//! - [`load`] never fails. A missing file, an empty file, or content that does
//!   not parse or validate all yield an empty [`Document`]. Anything other than
//!   a missing file is logged at `warn` level so the degradation is visible.
//! - [`try_load`] is the strict variant: a missing or empty file is still an
//!   empty document, but bad content is reported as `CorruptStore`.
//!
//! Validation happens once here, at the boundary:
//! - every device and stage id must be positive
//! - device ids must be unique in the document, stage ids unique per device
//! - `stage_count` is recomputed from the stage list
//!
//! ## Write Policy
//!
//! [`save`] creates the parent directory when needed and writes through a
//! uniquely named temporary sibling file followed by a rename, so a crash
//! mid-write leaves the previous document intact and readers only ever see a
//! complete document. There is no lock: two writers racing on the same file
//! both succeed and the last rename wins.

use crate::ids::first_duplicate_id;
use crate::{Document, SimuvidaError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum accepted size of the document file (64 MB).
///
/// Checked against file metadata before reading.
pub const MAX_STORE_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Default location of the document, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data/devices.json";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Store configuration: where the document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

// =============================================================================
// JSON STORE
// =============================================================================

/// Handle on the document file.
///
/// Holds only the path; each `load`/`save` goes to disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create a store from configuration.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self::open(config.data_file.clone())
    }

    /// Create a store for an explicit path.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lenient load. See [`load`].
    pub fn load(&self) -> Document {
        load(&self.path)
    }

    /// Strict load. See [`try_load`].
    pub fn try_load(&self) -> Result<Document, SimuvidaError> {
        try_load(&self.path)
    }

    /// Write the whole document. See [`save`].
    pub fn save(&self, document: &Document) -> Result<(), SimuvidaError> {
        save(&self.path, document)
    }
}

// =============================================================================
// LOAD
// =============================================================================

/// Read the document at `path`, substituting an empty document on any failure.
pub fn load(path: &Path) -> Document {
    match try_load(path) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Document store unreadable, continuing with an empty document"
            );
            Document::new()
        }
    }
}

/// Read the document at `path`, reporting unreadable content as an error.
///
/// A missing or empty file is not an error and yields an empty document.
pub fn try_load(path: &Path) -> Result<Document, SimuvidaError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No document yet, starting empty");
            return Ok(Document::new());
        }
        Err(e) => {
            return Err(SimuvidaError::CorruptStore(format!(
                "Cannot read file metadata: {}",
                e
            )));
        }
    };

    if metadata.len() > MAX_STORE_FILE_SIZE {
        return Err(SimuvidaError::CorruptStore(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_STORE_FILE_SIZE
        )));
    }

    let bytes = fs::read(path)
        .map_err(|e| SimuvidaError::CorruptStore(format!("Read document: {}", e)))?;

    document_from_slice(&bytes)
}

/// Parse and validate a document from raw bytes.
///
/// This is a pure transformation - no file I/O.
pub fn document_from_slice(bytes: &[u8]) -> Result<Document, SimuvidaError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }

    let mut document: Document = serde_json::from_slice(bytes)
        .map_err(|e| SimuvidaError::CorruptStore(format!("Invalid JSON document: {}", e)))?;

    validate_document(&mut document)?;
    Ok(document)
}

/// Enforce id invariants and repair derived fields.
fn validate_document(document: &mut Document) -> Result<(), SimuvidaError> {
    if let Some(id) = first_duplicate_id(&document.devices) {
        return Err(SimuvidaError::CorruptStore(format!(
            "Duplicate device id {}",
            id
        )));
    }

    for device in &mut document.devices {
        if device.id == 0 {
            return Err(SimuvidaError::CorruptStore(
                "Device id must be positive".to_string(),
            ));
        }
        if device.stages.iter().any(|s| s.id == 0) {
            return Err(SimuvidaError::CorruptStore(format!(
                "Device {} has a stage with id 0",
                device.id
            )));
        }
        if let Some(id) = first_duplicate_id(&device.stages) {
            return Err(SimuvidaError::CorruptStore(format!(
                "Device {} has duplicate stage id {}",
                device.id, id
            )));
        }
        if device.stage_count != device.stages.len() {
            tracing::debug!(
                device = device.id,
                recorded = device.stage_count,
                actual = device.stages.len(),
                "Repairing stage_count"
            );
            device.sync_stage_count();
        }
    }

    Ok(())
}

// =============================================================================
// SAVE
// =============================================================================

/// Serialize a document to pretty-printed JSON bytes.
///
/// This is a pure transformation - no file I/O.
pub fn document_to_vec(document: &Document) -> Result<Vec<u8>, SimuvidaError> {
    serde_json::to_vec_pretty(document)
        .map_err(|e| SimuvidaError::SerializationError(e.to_string()))
}

/// Write the whole document to `path`.
pub fn save(path: &Path, document: &Document) -> Result<(), SimuvidaError> {
    let data = document_to_vec(document)?;
    write_replace(path, &data)?;
    tracing::debug!(
        path = %path.display(),
        devices = document.devices.len(),
        "Document saved"
    );
    Ok(())
}

/// Write `data` to a uniquely named temporary file beside `path`, flush it,
/// then rename it over `path`.
///
/// Each call gets its own temporary file, so concurrent writers never share
/// one. A temporary file that is not renamed into place is removed on drop.
fn write_replace(path: &Path, data: &[u8]) -> Result<(), SimuvidaError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        SimuvidaError::IoError(format!(
            "Cannot create directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let mut file = NamedTempFile::new_in(parent)
        .map_err(|e| SimuvidaError::IoError(format!("Create temp file: {}", e)))?;
    file.write_all(data)
        .map_err(|e| SimuvidaError::IoError(format!("Write document: {}", e)))?;
    file.as_file()
        .sync_all()
        .map_err(|e| SimuvidaError::IoError(format!("Flush document: {}", e)))?;

    file.persist(path)
        .map(|_| ())
        .map_err(|e| SimuvidaError::IoError(format!("Replace document: {}", e.error)))
}

// =============================================================================
// TESTS
// =============================================================================
