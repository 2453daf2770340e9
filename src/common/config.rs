use std::path::PathBuf;

use anyhow::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

pub const DEFAULT_METRICS_PORT: u16 = 3030;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub node_id: Option<String>,
    pub hostname: String,
    #[serde(default)]
    pub target_directory: Option<String>,
    #[serde(default)]
    pub target_filename: Option<String>,
    pub metrics_port: u16,
    #[serde(default)]
    pub heartbeat_dir: Option<String>,
    pub heartbeat_interval_ms: u64,
    pub heartbeat_timeout_ms: u64,
}

/// Where the target file lives and which port every target advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSyncConfig {
    pub path: PathBuf,
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn node_id(&self) -> String {
        self.node_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{}-{}", self.hostname, std::process::id()))
    }

    /// `None` when either half of the target location is missing or blank.
    pub fn target_sync(&self) -> Option<TargetSyncConfig> {
        let dir = self.target_directory.as_deref().filter(|d| !d.trim().is_empty())?;
        let file = self.target_filename.as_deref().filter(|f| !f.trim().is_empty())?;
        Some(TargetSyncConfig {
            path: PathBuf::from(dir).join(file),
            metrics_port: self.metrics_port,
        })
    }
}

/// Defaults, then the optional file at `path`, then the process environment.
///
/// `TARGETDIR` and `TARGETFILE` are accepted as legacy names for
/// `target_directory` and `target_filename` and take precedence over both.
pub fn load_server_config(path: &str) -> Result<ServerConfig> {
    let merged = layered_sources(path)?.build()?;
    let legacy_dir = merged.get_string("targetdir").ok();
    let legacy_file = merged.get_string("targetfile").ok();

    let config = layered_sources(path)?
        .set_override_option("target_directory", legacy_dir)?
        .set_override_option("target_filename", legacy_file)?
        .build()?;
    let server_config: ServerConfig = config.try_deserialize()?;
    log::debug!("Loaded server config: {:?}", server_config);
    Ok(server_config)
}

fn layered_sources(path: &str) -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("hostname", "localhost")?
        .set_default("metrics_port", DEFAULT_METRICS_PORT as i64)?
        .set_default("heartbeat_interval_ms", 2000)?
        .set_default("heartbeat_timeout_ms", 10000)?
        .add_source(File::with_name(path).required(false))
        .add_source(Environment::default().try_parsing(true)))
}
