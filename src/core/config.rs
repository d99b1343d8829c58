//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sunbucks/config.toml`. If missing on first run, a
//! commented-out default is generated so operators can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Mode;
use crate::analysis::client::DEFAULT_SERVICE_URL;
use crate::capture::devices::DEFAULT_CAMERA_SOURCE;
use crate::capture::encode::DEFAULT_JPEG_QUALITY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SunbucksConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub mode: Option<Mode>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Webcam index (`"0"`), `"pattern"`, or a path to an image / directory
    /// of images.
    pub source: Option<String>,
    pub jpeg_quality: Option<u8>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub mode: Mode,
    pub service_url: String,
    pub poll_interval: Duration,
    pub camera_source: String,
    pub jpeg_quality: u8,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub mode: Option<Mode>,
    pub camera: Option<String>,
    pub service_url: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.sunbucks/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sunbucks").join("config.toml"))
}

/// Load config from `~/.sunbucks/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SunbucksConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SunbucksConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SunbucksConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SunbucksConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SunbucksConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SunbucksConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Sunbucks Kiosk Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# mode = "capture"                   # "capture" (photo on demand) or "poll"

# [service]
# base_url = "http://localhost:5001" # Or set SUNBUCKS_SERVICE_URL env var
# poll_interval_secs = 5             # poll mode only

# [camera]
# source = "0"                       # webcam index, "pattern", an image file, or a directory of images
# jpeg_quality = 90
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn env_mode() -> Option<Mode> {
    let raw = std::env::var("SUNBUCKS_MODE").ok()?;
    match Mode::from_str(&raw, true) {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!("Ignoring SUNBUCKS_MODE={:?}: {}", raw, e);
            None
        }
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SunbucksConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Mode: CLI → env → config → default
    let mode = cli
        .mode
        .or_else(env_mode)
        .or(config.general.mode)
        .unwrap_or_default();

    // Service URL: CLI → env → config → default
    let service_url = cli
        .service_url
        .clone()
        .or_else(|| std::env::var("SUNBUCKS_SERVICE_URL").ok())
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

    // Camera: CLI → env → config → default
    let camera_source = cli
        .camera
        .clone()
        .or_else(|| std::env::var("SUNBUCKS_CAMERA").ok())
        .or_else(|| config.camera.source.clone())
        .unwrap_or_else(|| DEFAULT_CAMERA_SOURCE.to_string());

    let poll_secs = config
        .service
        .poll_interval_secs
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
        .max(1);

    ResolvedConfig {
        mode,
        service_url,
        poll_interval: Duration::from_secs(poll_secs),
        camera_source,
        jpeg_quality: config
            .camera
            .jpeg_quality
            .unwrap_or(DEFAULT_JPEG_QUALITY)
            .clamp(1, 100),
    }
}
