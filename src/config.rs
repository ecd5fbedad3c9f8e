use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{ConversionOptions, TransparencyMode, DEFAULT_TOLERANCE};
use crate::validate::Limits;

pub const CONFIG_NAME: &str = "icoforge.toml";

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub limits: Limits,

    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// "preserve" (default), "auto" or "none"
    #[serde(default)]
    pub transparency: TransparencyMode,

    /// Chroma-key tolerance for "auto" (default: 10.0)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Apply alpha bleed before resizing (default: false)
    #[serde(default)]
    pub bleed: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            transparency: TransparencyMode::default(),
            tolerance: DEFAULT_TOLERANCE,
            bleed: false,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Timeout for downloading URL inputs, in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<()> {
        if self.limits.max_file_size == 0 {
            bail!("limits.max_file_size must be greater than 0");
        }
        if !self.conversion.tolerance.is_finite() || self.conversion.tolerance < 0.0 {
            bail!(
                "conversion.tolerance must be a non-negative number, got {}",
                self.conversion.tolerance
            );
        }
        if self.remote.timeout_secs == 0 {
            bail!("remote.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            tolerance: self.conversion.tolerance,
            alpha_bleed: self.conversion.bleed,
            ..ConversionOptions::from_mode(self.conversion.transparency)
        }
    }

    pub fn default_template() -> String {
        r#"# icoforge configuration

# Input limits
# [limits]
# max_file_size = 10485760   # bytes; larger inputs are rejected (default: 10 MiB)

# Conversion defaults (command-line flags override these)
# [conversion]
# transparency = "preserve"  # "preserve" (default), "auto" or "none"
#                            # preserve: keep alpha where the format has it (PNG, GIF, WebP)
#                            # auto:     key out the background color found in the corners
#                            # none:     write opaque frames
# tolerance = 10.0           # how close a pixel must be to the background to be keyed out
# bleed = false              # recolor transparent pixels to avoid halos when downsizing

# Downloading URL inputs
# [remote]
# timeout_secs = 30
"#
        .to_string()
    }
}
