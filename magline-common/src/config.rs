//! Configuration loading and data root resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/magline/<module>.toml`)
///
/// All fields are optional; unset fields fall back to the next tier of the
/// resolution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for per-job artifact workspaces
    pub data_root: Option<String>,
    /// HTTP bind address, e.g. "127.0.0.1:5740"
    pub bind_addr: Option<String>,
    /// Base URL of the external predictor endpoint
    pub predictor_url: Option<String>,
}

impl TomlConfig {
    /// Load a TOML config file, returning defaults when the file is absent.
    /// A missing config file must not prevent startup.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Default configuration file path for a module, e.g.
/// `~/.config/magline/magline-sd.toml` on Linux.
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("magline").join(format!("{}.toml", module_name)))
}

/// Resolve the data root folder following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_root(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.data_root {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_data_root()
}

/// Get OS-dependent default data root folder path
pub fn default_data_root() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/magline (or /var/lib/magline for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("magline"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/magline"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/magline
        dirs::data_dir()
            .map(|d| d.join("magline"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/magline"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\magline
        dirs::data_local_dir()
            .map(|d| d.join("magline"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\magline"))
    } else {
        PathBuf::from("./magline_data")
    }
}

/// Create the data root directory if it does not exist yet
pub fn ensure_data_root(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        tracing::info!("Created data root: {}", path.display());
    }
    Ok(())
}
