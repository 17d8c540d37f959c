//! JSON configuration file
//!
//! ```json
//! {
//!   "textures": { "search_roots": ["."], "cache_file": "texture_cache.json" },
//!   "scale": { "target_unit": "meters" }
//! }
//! ```
//!
//! Every field is optional. Relative paths are taken relative to the
//! directory containing the configuration file.

use anyhow::{Context, Result};
use obj_mtl::TargetUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mtl-creator.json";

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where textures and shader descriptions are found
    pub textures: TextureConfig,
    /// Unit conversion
    pub scale: ScaleConfig,
}

/// Texture discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Directories scanned recursively for textures and shader descriptions
    pub search_roots: Vec<PathBuf>,
    /// Persisted texture index
    pub cache_file: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            search_roots: vec![PathBuf::from(".")],
            cache_file: PathBuf::from("texture_cache.json"),
        }
    }
}

/// Unit conversion settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Unit vertex positions are converted to
    pub target_unit: TargetUnit,
}

impl Config {
    /// `mtl-creator.json` in the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load the configuration at `path`, which must exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        config.resolve_relative_to(config_dir(path));
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the configuration at `path`, falling back to defaults when the
    /// file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        log::warn!(
            "Config file {} not found, using defaults",
            path.display()
        );
        let mut config = Self::default();
        config.resolve_relative_to(config_dir(path));
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        // Cached texture paths must stay valid from any working directory
        let base = std::path::absolute(base).unwrap_or_else(|_| base.to_path_buf());
        for root in &mut self.textures.search_roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        if self.textures.cache_file.is_relative() {
            self.textures.cache_file = base.join(&self.textures.cache_file);
        }
    }
}

fn config_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
