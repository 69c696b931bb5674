//! # Device Catalog
//!
//! Fixed reference data compiled into the binary: for each device type a
//! display name, a description and an ordered list of life-cycle stage
//! templates, plus a list of generic mitigation decisions.
//!
//! The tables are `static` and never mutated. A [`DeviceCatalog`] is a cheap
//! view over them that components receive at construction time.
//!
//! ## Auto-Creation Rule
//!
//! A generated device copies every stage template of its type, in order, with
//! stage ids `1..=n`. Stage `i` (0-based) receives the first `2 + (i % 3)`
//! generic decisions in declared order, so five stages carry
//! `[2, 3, 4, 2, 3]` decisions.

use crate::{Decision, Device, DeviceType, Impact, SimuvidaError, Stage};

// =============================================================================
// TEMPLATE TYPES
// =============================================================================

/// A stage as declared in the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTemplate {
    pub name: &'static str,
    pub impact: Impact,
    /// When absent, generated stages get a description derived from the name.
    pub description: Option<&'static str>,
}

/// Display name and description of a device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Everything the catalog knows about one device type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceTemplate {
    pub device_type: DeviceType,
    pub info: DeviceInfo,
    pub stages: &'static [StageTemplate],
}

/// A generic mitigation decision as declared in the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionTemplate {
    pub id: u64,
    pub name: &'static str,
    pub impact: Impact,
}

impl DecisionTemplate {
    /// Owned copy suitable for attaching to a stage.
    #[must_use]
    pub fn to_decision(&self) -> Decision {
        Decision {
            id: self.id,
            name: self.name.to_string(),
            impact: self.impact,
        }
    }
}

// =============================================================================
// REFERENCE TABLES
// =============================================================================

const EXTRACTION: &str = "Raw Material Extraction";
const MANUFACTURING: &str = "Manufacturing and Assembly";
const DISTRIBUTION: &str = "Distribution and Transport";
const USE_PHASE: &str = "Use and Energy Consumption";
const END_OF_LIFE: &str = "End of Life and Recycling";

const fn stage(
    name: &'static str,
    co2: f64,
    water: f64,
    waste: f64,
    description: &'static str,
) -> StageTemplate {
    StageTemplate {
        name,
        impact: Impact::new(co2, water, waste),
        description: Some(description),
    }
}

static PHONE_STAGES: [StageTemplate; 5] = [
    stage(EXTRACTION, 8.5, 150.0, 3.2, "Mining of rare metals, lithium, cobalt and other materials"),
    stage(MANUFACTURING, 12.3, 220.0, 5.1, "Production of electronic components and final assembly"),
    stage(DISTRIBUTION, 2.8, 15.0, 0.8, "Transport from factories to points of sale"),
    stage(USE_PHASE, 18.5, 85.0, 1.2, "Electricity consumed over the device's service life"),
    stage(END_OF_LIFE, 3.2, 25.0, 2.5, "E-waste handling and material recovery"),
];

static LAPTOP_STAGES: [StageTemplate; 5] = [
    stage(EXTRACTION, 45.0, 800.0, 12.5, "Mineral extraction for processors, memory and batteries"),
    stage(MANUFACTURING, 125.0, 1500.0, 28.0, "Component manufacturing and laptop assembly"),
    stage(DISTRIBUTION, 8.5, 45.0, 2.1, "Global logistics and distribution"),
    stage(USE_PHASE, 180.0, 350.0, 5.8, "Energy consumed over 3-5 years of typical use"),
    stage(END_OF_LIFE, 12.0, 120.0, 15.2, "Disassembly and recovery of valuable components"),
];

static MONITOR_STAGES: [StageTemplate; 5] = [
    stage(EXTRACTION, 32.0, 650.0, 9.8, "Sourcing materials for the LCD/LED panel and circuitry"),
    stage(MANUFACTURING, 85.0, 1200.0, 22.0, "Production of the display panel and electronics"),
    stage(DISTRIBUTION, 6.2, 35.0, 1.5, "Transport and packaging of the product"),
    stage(USE_PHASE, 95.0, 180.0, 3.2, "Energy consumed over its service life"),
    stage(END_OF_LIFE, 8.5, 90.0, 11.5, "Recycling of metals, plastics and electronic components"),
];

static TABLET_STAGES: [StageTemplate; 5] = [
    stage(EXTRACTION, 15.0, 280.0, 5.5, "Mining of materials for the touch screen and battery"),
    stage(MANUFACTURING, 28.0, 450.0, 9.2, "Touch screen fabrication and component assembly"),
    stage(DISTRIBUTION, 4.2, 25.0, 1.2, "Distribution from production centres"),
    stage(USE_PHASE, 32.0, 120.0, 2.1, "Energy consumed over 3-4 years of use"),
    stage(END_OF_LIFE, 5.5, 45.0, 4.8, "Material recovery and waste management"),
];

/// Built-in device types, in display order.
pub static DEVICE_TEMPLATES: [DeviceTemplate; 4] = [
    DeviceTemplate {
        device_type: DeviceType::Phone,
        info: DeviceInfo {
            name: "Smartphone",
            description: "Smart mobile device with many functions",
        },
        stages: &PHONE_STAGES,
    },
    DeviceTemplate {
        device_type: DeviceType::Laptop,
        info: DeviceInfo {
            name: "Laptop",
            description: "Portable computer for work and entertainment",
        },
        stages: &LAPTOP_STAGES,
    },
    DeviceTemplate {
        device_type: DeviceType::Monitor,
        info: DeviceInfo {
            name: "Monitor",
            description: "Display screen for computers",
        },
        stages: &MONITOR_STAGES,
    },
    DeviceTemplate {
        device_type: DeviceType::Tablet,
        info: DeviceInfo {
            name: "Tablet",
            description: "Versatile touch device for many uses",
        },
        stages: &TABLET_STAGES,
    },
];

/// Generic environmental improvement decisions, in declared order.
pub static GENERIC_DECISIONS: [DecisionTemplate; 4] = [
    DecisionTemplate {
        id: 1,
        name: "Use recycled materials",
        impact: Impact::new(-0.8, -15.0, -0.5),
    },
    DecisionTemplate {
        id: 2,
        name: "Optimise production processes",
        impact: Impact::new(-1.2, -25.0, -0.8),
    },
    DecisionTemplate {
        id: 3,
        name: "Renewable energy",
        impact: Impact::new(-2.5, -10.0, -0.3),
    },
    DecisionTemplate {
        id: 4,
        name: "Modular repairable design",
        impact: Impact::new(-1.5, -20.0, -1.2),
    },
];

/// Number of generic decisions offered on stage `index` (0-based).
#[must_use]
pub const fn decision_count_for_stage(index: usize) -> usize {
    2 + (index % 3)
}

// =============================================================================
// CATALOG
// =============================================================================

/// Read-only view over the reference tables.
#[derive(Debug, Clone, Copy)]
pub struct DeviceCatalog {
    devices: &'static [DeviceTemplate],
    decisions: &'static [DecisionTemplate],
}

impl DeviceCatalog {
    /// Catalog over explicit tables.
    #[must_use]
    pub const fn new(
        devices: &'static [DeviceTemplate],
        decisions: &'static [DecisionTemplate],
    ) -> Self {
        Self { devices, decisions }
    }

    /// Catalog over the built-in tables.
    #[must_use]
    pub const fn builtin() -> Self {
        Self::new(&DEVICE_TEMPLATES, &GENERIC_DECISIONS)
    }

    /// All device types the catalog can generate.
    pub fn templates(&self) -> &'static [DeviceTemplate] {
        self.devices
    }

    /// Generic decisions in declared order.
    pub fn generic_decisions(&self) -> &'static [DecisionTemplate] {
        self.decisions
    }

    /// Template for a type key such as `"laptop"`.
    pub fn template_for(&self, device_type: &str) -> Result<&'static DeviceTemplate, SimuvidaError> {
        let parsed: DeviceType = device_type.parse()?;
        self.devices
            .iter()
            .find(|t| t.device_type == parsed)
            .ok_or_else(|| {
                SimuvidaError::InvalidInput(format!(
                    "device type '{}' is not in the catalog",
                    parsed
                ))
            })
    }

    /// Ordered stage templates for a type key.
    pub fn stage_templates_for(
        &self,
        device_type: &str,
    ) -> Result<&'static [StageTemplate], SimuvidaError> {
        Ok(self.template_for(device_type)?.stages)
    }

    /// Display name and description for a type key.
    pub fn device_info_for(&self, device_type: &str) -> Result<DeviceInfo, SimuvidaError> {
        Ok(self.template_for(device_type)?.info)
    }

    /// Owned copies of the decisions offered on stage `index` (0-based).
    pub fn decisions_for_stage(&self, index: usize) -> Vec<Decision> {
        self.decisions
            .iter()
            .take(decision_count_for_stage(index))
            .map(DecisionTemplate::to_decision)
            .collect()
    }

    /// Materialize a new device of `device_type` with the given id.
    ///
    /// Fails with `InvalidInput` for unknown types.
    pub fn build_device(&self, device_type: &str, id: u64) -> Result<Device, SimuvidaError> {
        let template = self.template_for(device_type)?;

        let stages: Vec<Stage> = template
            .stages
            .iter()
            .enumerate()
            .map(|(i, t)| Stage {
                id: i as u64 + 1,
                name: t.name.to_string(),
                impact: t.impact,
                description: t
                    .description
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Environmental impact of: {}", t.name)),
                decisions: self.decisions_for_stage(i),
            })
            .collect();

        Ok(Device {
            id,
            name: template.info.name.to_string(),
            device_type: template.device_type.as_str().to_string(),
            stage_count: stages.len(),
            description: template.info.description.to_string(),
            stages,
        })
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// TESTS
// =============================================================================
