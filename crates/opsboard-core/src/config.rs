use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::handover::HandoverPolicy;

/// Top-level config parsed from `opsboard.toml` at the workspace root.
///
/// Every field has a default; a missing file yields `ProjectConfig::default()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// When `true`, a handover leaves `Project::pic` unchanged until the
    /// incoming user confirms. Off by default: the shipped dashboard moved
    /// the PIC at initiate time and treated confirmation as informational.
    #[serde(default)]
    pub require_handover_confirmation: bool,
}

impl WorkflowConfig {
    #[must_use]
    pub const fn handover_policy(&self) -> HandoverPolicy {
        HandoverPolicy {
            require_confirmation: self.require_handover_confirmation,
        }
    }
}

/// Knobs for the mock data source used before a real backend exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Artificial latency applied to the initial load, in milliseconds.
    #[serde(default)]
    pub simulated_delay_ms: u64,
    /// Force the initial load to fail, for exercising the error path.
    #[serde(default)]
    pub fail_load: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 0,
            fail_load: false,
        }
    }
}

/// Load config from `<root>/opsboard.toml`.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed. A missing file
/// is not an error.
pub fn load_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join("opsboard.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
