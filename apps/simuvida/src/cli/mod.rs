//! # SimuVida CLI Module
//!
//! This module implements the CLI interface for SimuVida.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `list` - List devices
//! - `show` - Show one device with its stages
//! - `create` - Generate a device from the catalog
//! - `edit` - Edit a device's name, type and description
//! - `delete` - Delete a device
//! - `add-stage` - Append a custom stage to a device
//! - `catalog` - Show the device types and generic decisions
//! - `init` - Create an empty document
//! - `check` - Validate the document file

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use simuvida_core::{Impact, SimuvidaError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// SimuVida - environmental life-cycle tracker for electronic devices
///
/// Keeps devices, their life-cycle stages and mitigation decisions in a
/// single JSON document.
#[derive(Parser, Debug)]
#[command(name = "simuvida")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print the resolved configuration before running
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the device document (overrides config and environment)
    #[arg(short = 'D', long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List all devices
    List,

    /// Show one device with its stages and decisions
    Show {
        /// Device id
        id: u64,
    },

    /// Generate a device from the catalog (phone, laptop, monitor, tablet)
    Create {
        /// Device type
        device_type: String,
    },

    /// Edit a device's name, type and description
    Edit {
        /// Device id
        id: u64,

        /// New name
        #[arg(short, long)]
        name: String,

        /// New type (free-form)
        #[arg(short = 't', long = "type")]
        device_type: String,

        /// New description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a device
    Delete {
        /// Device id
        id: u64,
    },

    /// Append a custom stage to a device
    AddStage {
        /// Device id
        device_id: u64,

        /// Stage name
        #[arg(short, long)]
        name: String,

        /// CO2 emitted (kg)
        #[arg(long, allow_negative_numbers = true)]
        co2: f64,

        /// Water used (liters)
        #[arg(long, allow_negative_numbers = true)]
        water: f64,

        /// Waste generated (kg)
        #[arg(long, allow_negative_numbers = true)]
        waste: f64,

        /// Stage description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Show the catalog of device types and generic decisions
    Catalog,

    /// Create an empty device document
    Init {
        /// Overwrite an existing document
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the device document without modifying it
    Check,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve configuration from the config file, environment and CLI flags.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, SimuvidaError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_file) = &cli.data_file {
        config.store.data_file = data_file.clone();
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SimuvidaError> {
    let config = resolve_config(&cli)?;
    let json_mode = cli.json_mode;

    if cli.verbose {
        eprintln!("Data file: {}", config.store.data_file.display());
        eprintln!("Server:    {}", config.server.addr());
    }

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::List) | None => cmd_list(&config, json_mode),
        Some(Commands::Show { id }) => cmd_show(&config, json_mode, id),
        Some(Commands::Create { device_type }) => cmd_create(&config, json_mode, &device_type),
        Some(Commands::Edit {
            id,
            name,
            device_type,
            description,
        }) => cmd_edit(&config, json_mode, id, name, device_type, description),
        Some(Commands::Delete { id }) => cmd_delete(&config, json_mode, id),
        Some(Commands::AddStage {
            device_id,
            name,
            co2,
            water,
            waste,
            description,
        }) => cmd_add_stage(
            &config,
            json_mode,
            device_id,
            name,
            Impact::new(co2, water, waste),
            description,
        ),
        Some(Commands::Catalog) => cmd_catalog(json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Check) => cmd_check(&config, json_mode),
    }
}

// =============================================================================
// TESTS
// =============================================================================
