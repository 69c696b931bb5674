//! # Configuration
//!
//! Settings are resolved in this order, later sources winning:
//! 1. Built-in defaults (`data/devices.json`, `127.0.0.1:5000`)
//! 2. A TOML file: `--config <file>`, or `simuvida.toml` in the working
//!    directory when present
//! 3. `SIMUVIDA_DATA_FILE` environment variable
//! 4. CLI flags (`--data-file`, `server --host/--port`)
//!
//! ```toml
//! [store]
//! data_file = "data/devices.json"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! ```

use serde::{Deserialize, Serialize};
use simuvida_core::{SimuvidaError, StoreConfig};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "simuvida.toml";

/// Environment variable overriding the document path.
pub const DATA_FILE_ENV: &str = "SIMUVIDA_DATA_FILE";

/// Maximum accepted config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse a TOML document. Missing sections and keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SimuvidaError> {
        toml::from_str(text)
            .map_err(|e| SimuvidaError::InvalidInput(format!("Invalid config file: {}", e)))
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, SimuvidaError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            SimuvidaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(SimuvidaError::InvalidInput(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            SimuvidaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve configuration from an explicit file, the default file, or
    /// defaults, then apply environment overrides.
    ///
    /// An explicit path that cannot be read is an error; the default file is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SimuvidaError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_data_file_override(std::env::var(DATA_FILE_ENV).ok()))
    }

    /// Replace the data file when `data_file` is set and non-empty.
    #[must_use]
    pub fn with_data_file_override(mut self, data_file: Option<String>) -> Self {
        if let Some(path) = data_file.filter(|p| !p.trim().is_empty()) {
            self.store.data_file = PathBuf::from(path);
        }
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
