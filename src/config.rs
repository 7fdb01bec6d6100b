use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::OutputEncoding;
use crate::resolver::DEFAULT_VERSION_TAG_FILE;

pub const CONFIG_FILE_NAME: &str = "update-assembly-info.yml";

/// Defaults applied when the command line does not provide a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub company: Option<String>,
    pub product: Option<String>,
    pub copyright: Option<String>,
    pub trademark: Option<String>,
    pub usings: Vec<String>,
    pub encoding: Option<OutputEncoding>,
    pub source_control_revision: bool,
    pub build_info: bool,
    /// File at the repository root holding the next version tag.
    pub version_tag_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company: None,
            product: None,
            copyright: None,
            trademark: None,
            usings: Vec::new(),
            encoding: None,
            source_control_revision: false,
            build_info: false,
            version_tag_file: DEFAULT_VERSION_TAG_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/update-assembly-info/update-assembly-info.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join("update-assembly-info").join(CONFIG_FILE_NAME);
            if let Some(config) = Self::try_load(&primary_config) {
                return Ok(config);
            }
        }

        // Try fallback location: ./update-assembly-info.yml
        if let Some(config) = Self::try_load(Path::new(CONFIG_FILE_NAME)) {
            return Ok(config);
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn try_load(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config from {}: {}", path.display(), e);
                None
            }
        }
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
