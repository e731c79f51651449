//! Application Configuration
//!
//! Detection thresholds and scan settings stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::scan::{OrderingOptions, ScanOptions};
use crate::vision::{DetectionOptions, RegionOptions, SignatureConfig};

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Signature search-area sizing
    pub region: RegionOptions,
    /// Ink thresholds
    pub detection: DetectionOptions,
    /// Reading-order settings
    pub ordering: OrderingOptions,
    /// PDF rendering settings
    pub renderer: RendererSettings,
    /// Input file settings
    pub input: InputSettings,
}

impl AppConfig {
    /// Settings for a scan run
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            signature: SignatureConfig {
                region: self.region.clone(),
                detection: self.detection.clone(),
            },
            ordering: self.ordering.clone(),
            render_scale: self.renderer.scale,
            max_image_bytes: self.input.max_image_bytes,
        }
    }
}

/// PDF rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Render scale (5.0 resolves thin pen strokes on letter-size pages)
    pub scale: f32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self { scale: 5.0 }
    }
}

/// Input file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Largest image or PDF file accepted, in bytes
    pub max_image_bytes: u64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid config file: {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Platform config file location (`.../sigscan/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "sigscan", "SigScan")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load `path` if given, else the platform config file if it exists, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        info!("Loading config from {:?}", path);
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            info!("Loading config from {:?}", path);
            load_config(&path)
        }
        _ => {
            debug!("No config file, using defaults");
            Ok(AppConfig::default())
        }
    }
}
