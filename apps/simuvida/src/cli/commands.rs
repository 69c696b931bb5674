//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Offline commands open their own service over the configured document.
//! They are not coordinated with a running server: a command and the server
//! writing at the same time race, and the last save wins.

use crate::api;
use crate::config::AppConfig;
use simuvida_core::{
    Device, DeviceCatalog, DeviceEdit, DeviceService, Document, Impact, JsonStore, NewStage,
    SimuvidaError, Stage,
};

/// Print a value as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn service_for(config: &AppConfig) -> DeviceService {
    DeviceService::from_config(&config.store)
}

fn print_device_line(device: &Device) {
    println!(
        "  [{:>3}] {:<24} {:<10} {} stage(s)",
        device.id, device.name, device.device_type, device.stage_count
    );
}

fn print_stage(stage: &Stage) {
    println!("  Stage {}: {}", stage.id, stage.name);
    println!(
        "    CO2: {} kg   Water: {} L   Waste: {} kg",
        stage.impact.co2, stage.impact.water, stage.impact.waste
    );
    if !stage.description.is_empty() {
        println!("    {}", stage.description);
    }
    for decision in &stage.decisions {
        println!(
            "    - {} (CO2 {:+}, water {:+}, waste {:+})",
            decision.name, decision.impact.co2, decision.impact.water, decision.impact.waste
        );
    }
}

fn print_device(device: &Device) {
    println!("Device {}", device.id);
    println!("==========");
    println!("Name:        {}", device.name);
    println!("Type:        {}", device.device_type);
    println!("Description: {}", device.description);
    println!("Stages:      {}", device.stage_count);
    println!();
    for stage in &device.stages {
        print_stage(stage);
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Routes served by `api::create_router`, as listed at startup.
const ENDPOINTS: [&str; 9] = [
    "GET    /health                            - Health check",
    "GET    /catalog                           - Device types and decisions",
    "GET    /devices                           - List devices",
    "GET    /devices/{id}                      - Fetch a device",
    "POST   /devices/auto/{type}               - Generate a device",
    "PUT    /devices/{id}                      - Edit a device",
    "DELETE /devices/{id}                      - Delete a device",
    "POST   /devices/{id}/stages               - Add a stage",
    "GET    /devices/{id}/stages/{stage_id}    - Fetch a stage",
];

/// Start the HTTP server.
///
/// Creates an empty document first when none exists.
pub async fn cmd_server(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), SimuvidaError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = service_for(&config);
    if !service.store().path().exists() {
        service.store().save(&Document::new())?;
        tracing::info!(
            path = %service.store().path().display(),
            "Created empty device document"
        );
    }

    println!("SimuVida Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:      {}", config.server.host);
    println!("  Port:      {}", config.server.port);
    println!("  Data file: {}", config.store.data_file.display());
    println!();
    println!("Endpoints:");
    for line in ENDPOINTS {
        println!("  {}", line);
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.server.addr(), service).await
}

// =============================================================================
// LIST / SHOW COMMANDS
// =============================================================================

/// List all devices.
pub fn cmd_list(config: &AppConfig, json_mode: bool) -> Result<(), SimuvidaError> {
    let devices = service_for(config).list_devices();

    if json_mode {
        print_json(&api::DeviceListResponse::new(devices));
        return Ok(());
    }

    println!("Devices ({})", devices.len());
    println!("=============");
    if devices.is_empty() {
        println!("  No devices yet. Try `simuvida create laptop`.");
    }
    for device in &devices {
        print_device_line(device);
    }
    Ok(())
}

/// Show one device.
pub fn cmd_show(config: &AppConfig, json_mode: bool, id: u64) -> Result<(), SimuvidaError> {
    let device = service_for(config).get_device(id)?;
    if json_mode {
        print_json(&device);
    } else {
        print_device(&device);
    }
    Ok(())
}

// =============================================================================
// MUTATING COMMANDS
// =============================================================================

/// Generate a device from the catalog.
pub fn cmd_create(
    config: &AppConfig,
    json_mode: bool,
    device_type: &str,
) -> Result<(), SimuvidaError> {
    let device = service_for(config).create_from_catalog(device_type)?;
    if json_mode {
        print_json(&device);
    } else {
        println!(
            "Device \"{}\" created with {} life-cycle stages (id {}).",
            device.name, device.stage_count, device.id
        );
    }
    Ok(())
}

/// Edit a device's name, type and description.
pub fn cmd_edit(
    config: &AppConfig,
    json_mode: bool,
    id: u64,
    name: String,
    device_type: String,
    description: String,
) -> Result<(), SimuvidaError> {
    let edit = DeviceEdit {
        name,
        device_type,
        description,
    };
    let device = service_for(config).edit_device(id, &edit)?;
    if json_mode {
        print_json(&device);
    } else {
        println!("Device {} updated.", device.id);
    }
    Ok(())
}

/// Delete a device.
pub fn cmd_delete(config: &AppConfig, json_mode: bool, id: u64) -> Result<(), SimuvidaError> {
    let device = service_for(config).delete_device(id)?;
    if json_mode {
        print_json(&device);
    } else {
        println!("Device {} (\"{}\") deleted.", device.id, device.name);
    }
    Ok(())
}

/// Append a custom stage to a device.
pub fn cmd_add_stage(
    config: &AppConfig,
    json_mode: bool,
    device_id: u64,
    name: String,
    impact: Impact,
    description: String,
) -> Result<(), SimuvidaError> {
    let new_stage = NewStage {
        name,
        impact,
        description,
    };
    let stage = service_for(config).add_stage(device_id, &new_stage)?;
    if json_mode {
        print_json(&stage);
    } else {
        println!(
            "Stage {} (\"{}\") added to device {}.",
            stage.id, stage.name, device_id
        );
    }
    Ok(())
}

// =============================================================================
// CATALOG COMMAND
// =============================================================================

/// Show the built-in catalog.
pub fn cmd_catalog(json_mode: bool) -> Result<(), SimuvidaError> {
    let catalog = DeviceCatalog::builtin();

    if json_mode {
        print_json(&api::CatalogResponse::from_catalog(&catalog));
        return Ok(());
    }

    println!("Device Types");
    println!("============");
    for template in catalog.templates() {
        println!(
            "  {:<8} {} - {}",
            template.device_type, template.info.name, template.info.description
        );
        for (i, stage) in template.stages.iter().enumerate() {
            println!(
                "    {}. {} (CO2 {} kg, water {} L, waste {} kg)",
                i + 1,
                stage.name,
                stage.impact.co2,
                stage.impact.water,
                stage.impact.waste
            );
        }
    }
    println!();
    println!("Generic Decisions");
    println!("=================");
    for decision in catalog.generic_decisions() {
        println!(
            "  {}. {} (CO2 {:+}, water {:+}, waste {:+})",
            decision.id,
            decision.name,
            decision.impact.co2,
            decision.impact.water,
            decision.impact.waste
        );
    }
    Ok(())
}

// =============================================================================
// INIT / CHECK COMMANDS
// =============================================================================

/// Create an empty document.
pub fn cmd_init(config: &AppConfig, force: bool) -> Result<(), SimuvidaError> {
    let store = JsonStore::new(&config.store);

    if store.path().exists() && !force {
        return Err(SimuvidaError::InvalidInput(format!(
            "Document already exists at {}. Use --force to overwrite.",
            store.path().display()
        )));
    }

    store.save(&Document::new())?;
    println!("Initialized empty document at {}", store.path().display());
    Ok(())
}

/// Validate the document with the strict loader.
pub fn cmd_check(config: &AppConfig, json_mode: bool) -> Result<(), SimuvidaError> {
    let store = JsonStore::new(&config.store);
    let document = store.try_load()?;
    let stages: usize = document.devices.iter().map(|d| d.stages.len()).sum();

    if json_mode {
        print_json(&serde_json::json!({
            "data_file": store.path().to_string_lossy(),
            "exists": store.path().exists(),
            "valid": true,
            "devices": document.devices.len(),
            "stages": stages
        }));
        return Ok(());
    }

    println!("Document OK: {}", store.path().display());
    println!("  Devices: {}", document.devices.len());
    println!("  Stages:  {}", stages);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
