//! Configuration resolution for magline-sd
//!
//! Every setting resolves through the same priority order:
//! CLI flag → environment variable → TOML config file → compiled default.

use std::path::PathBuf;

use clap::Parser;

use magline_common::config::{default_config_path, resolve_data_root, TomlConfig};
use magline_common::Result;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5740";
const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:5741";

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
    name = "magline-sd",
    about = "Magline station densifier service",
    version
)]
pub struct CliArgs {
    /// Root folder for per-job artifact workspaces
    #[arg(long)]
    pub data_root: Option<String>,

    /// HTTP bind address, e.g. 127.0.0.1:5740
    #[arg(long)]
    pub bind_addr: Option<String>,

    /// Base URL of the external predictor endpoint
    #[arg(long)]
    pub predictor_url: Option<String>,

    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long)]
    pub config: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_root: PathBuf,
    pub bind_addr: String,
    pub predictor_url: String,
}

impl ServiceConfig {
    /// Resolve the configuration from CLI arguments, environment, and the
    /// TOML config file. A missing config file is not an error.
    pub fn resolve(cli: &CliArgs) -> Result<Self> {
        let toml_path = cli
            .config
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| default_config_path("magline-sd"));
        let toml_config = match &toml_path {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::default(),
        };

        let data_root = resolve_data_root(
            cli.data_root.as_deref(),
            "MAGLINE_DATA_ROOT",
            &toml_config,
        );

        let bind_addr = resolve_setting(
            cli.bind_addr.as_deref(),
            "MAGLINE_BIND_ADDR",
            toml_config.bind_addr.as_deref(),
            DEFAULT_BIND_ADDR,
        );

        let predictor_url = resolve_setting(
            cli.predictor_url.as_deref(),
            "MAGLINE_PREDICTOR_URL",
            toml_config.predictor_url.as_deref(),
            DEFAULT_PREDICTOR_URL,
        );

        Ok(Self {
            data_root,
            bind_addr,
            predictor_url,
        })
    }
}

fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    default: &str,
) -> String {
    if let Some(value) = cli_arg {
        return value.to_string();
    }
    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    if let Some(value) = toml_value {
        return value.to_string();
    }
    default.to_string()
}
