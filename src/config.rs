use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    composition::FitPolicy,
    error::{ConfigError, Result},
};

/// Main configuration for the filter pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where bundled assets are read from
    pub assets: AssetConfig,

    /// Filter engine settings
    pub engine: EngineConfig,

    /// Overlay layer settings
    pub overlay: OverlayConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.overlay.validate()?;
        Ok(())
    }
}

/// Asset locations; a missing path disables only the filters that need it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Bitmap composited by the glitch filter
    pub overlay_image: Option<PathBuf>,

    /// Manifest listing the available region-kernel entry points
    pub kernel_bundle: Option<PathBuf>,

    /// `.cube` table for the color cube filter
    pub color_lut: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            overlay_image: Some(PathBuf::from("assets/glitch.png")),
            kernel_bundle: Some(PathBuf::from("assets/kernels.toml")),
            color_lut: None,
        }
    }
}

/// Filter engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for the per-frame randomness; `None` draws from entropy
    pub random_seed: Option<u64>,

    /// Largest glitch overlay shift per axis (pixels)
    pub glitch_max_offset: f32,

    /// Smallest side of the static noise window (pixels)
    pub static_min_size: u32,

    /// Largest side of the static noise window (pixels)
    pub static_max_size: u32,

    /// Largest offset of the static noise window per axis (pixels)
    pub static_max_offset: u32,

    /// Number of threads used for batch processing
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            glitch_max_offset: 50.0,
            static_min_size: 100,
            static_max_size: 300,
            static_max_offset: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if !self.glitch_max_offset.is_finite() || self.glitch_max_offset < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.glitch_max_offset".to_string(),
                value: self.glitch_max_offset.to_string()
            }.into());
        }

        if self.static_min_size == 0 || self.static_min_size > self.static_max_size {
            return Err(ConfigError::InvalidValue {
                key: "engine.static_size_range".to_string(),
                value: format!("{}-{}", self.static_min_size, self.static_max_size)
            }.into());
        }

        if self.worker_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.worker_threads".to_string(),
                value: self.worker_threads.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Overlay layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Opacity of the overlay layer (0.0-1.0)
    pub opacity: f32,

    /// How overlay frames are scaled onto the camera frame
    pub fit: FitPolicy,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            opacity: 0.7,
            fit: FitPolicy::Stretch,
        }
    }
}

impl OverlayConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::InvalidValue {
                key: "overlay.opacity".to_string(),
                value: self.opacity.to_string()
            }.into());
        }

        Ok(())
    }
}
