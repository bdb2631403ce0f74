//! Project configuration stored in `<root>/chaos.toml`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::path::validate_relative_path;
use crate::error::{ChaosError, Result};

/// File name looked up at the project root.
pub const CONFIG_FILE: &str = "chaos.toml";

/// Chaos tool configuration (TOML).
///
/// Every field is optional in the file; missing fields keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChaosConfig {
    /// Snapshot root, relative to the project root.
    pub backup_dir: String,

    /// Manifest file name inside `backup_dir`.
    pub manifest_file: String,

    /// Directory scanned by `chaos templates`, relative to the project root.
    pub templates_dir: String,

    /// Number of template lines shown by `chaos info`.
    pub preview_lines: usize,

    /// Ask before `chaos restore` overwrites files.
    pub confirm_restore: bool,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            backup_dir: ".chaos-backup".to_string(),
            manifest_file: "metadata.json".to_string(),
            templates_dir: "chaos-templates".to_string(),
            preview_lines: 15,
            confirm_restore: true,
        }
    }
}

impl ChaosConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backup_dir.trim().is_empty() {
            return Err(ChaosError::InvalidConfig(
                "backup_dir must not be empty".to_string(),
            ));
        }
        if self.manifest_file.trim().is_empty() || self.manifest_file.contains(['/', '\\']) {
            return Err(ChaosError::InvalidConfig(
                "manifest_file must be a plain file name".to_string(),
            ));
        }
        if self.templates_dir.trim().is_empty() {
            return Err(ChaosError::InvalidConfig(
                "templates_dir must not be empty".to_string(),
            ));
        }
        for (field, value) in [
            ("backup_dir", &self.backup_dir),
            ("templates_dir", &self.templates_dir),
        ] {
            validate_relative_path(value)
                .map_err(|err| ChaosError::InvalidConfig(format!("{field}: {err}")))?;
        }
        if self.preview_lines == 0 {
            return Err(ChaosError::InvalidConfig(
                "preview_lines must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load config from `<root>/chaos.toml`.
///
/// If the file is missing, returns `ChaosConfig::default()`.
pub fn load_config(root: &Path) -> Result<ChaosConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        let cfg = ChaosConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents =
        fs::read_to_string(&path).map_err(|err| ChaosError::io("read config", &path, err))?;
    let cfg: ChaosConfig = toml::from_str(&contents)
        .map_err(|err| ChaosError::InvalidConfig(format!("parse {}: {}", path.display(), err)))?;
    cfg.validate()?;
    debug!(path = %path.display(), backup_dir = %cfg.backup_dir, "config loaded");
    Ok(cfg)
}
