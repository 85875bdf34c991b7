//! Bundled assets: the glitch overlay bitmap, the region-kernel bundle
//! manifest and an optional color LUT.
//!
//! Loading never aborts start-up. Each asset ends up in an [`AssetSlot`]
//! and the kernel library decides per filter what a missing asset means.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AssetConfig;
use crate::error::AssetError;
use crate::frame::Frame;
use crate::kernels::ColorCube;

/// Manifest of the region-kernel entry points shipped with the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelBundle {
    pub name: String,
    pub entry_points: Vec<String>,
}

impl KernelBundle {
    /// Bundle with every entry point this crate implements
    pub fn builtin() -> Self {
        Self {
            name: "builtin".to_string(),
            entry_points: vec!["crosshatch".to_string(), "polar_pixellate".to_string()],
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| AssetError::Missing {
            name: "kernel_bundle".to_string(),
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| AssetError::InvalidBundle {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn has_entry(&self, entry: &str) -> bool {
        self.entry_points.iter().any(|e| e == entry)
    }
}

/// Outcome of loading one asset
#[derive(Debug, Clone)]
pub enum AssetSlot<T> {
    Loaded(T),
    NotConfigured,
    Failed(String),
}

impl<T> AssetSlot<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, AssetSlot::Loaded(_))
    }

    /// Why the asset is not usable, for log and error messages
    pub fn describe(&self, what: &str) -> String {
        match self {
            AssetSlot::Loaded(_) => format!("{} loaded", what),
            AssetSlot::NotConfigured => format!("no {} configured", what),
            AssetSlot::Failed(reason) => format!("{} failed to load: {}", what, reason),
        }
    }

    fn from_result(result: Result<T, AssetError>, what: &str) -> Self {
        match result {
            Ok(value) => {
                debug!("Loaded {}", what);
                AssetSlot::Loaded(value)
            }
            Err(e) => {
                warn!("Could not load {}: {}", what, e);
                AssetSlot::Failed(e.to_string())
            }
        }
    }
}

/// Everything the kernel library may depend on
#[derive(Debug, Clone)]
pub struct AssetStore {
    pub overlay: AssetSlot<Arc<Frame>>,
    pub bundle: AssetSlot<KernelBundle>,
    pub color_lut: AssetSlot<Arc<ColorCube>>,
}

impl AssetStore {
    /// Store with nothing configured
    pub fn empty() -> Self {
        Self {
            overlay: AssetSlot::NotConfigured,
            bundle: AssetSlot::NotConfigured,
            color_lut: AssetSlot::NotConfigured,
        }
    }

    /// Load whatever `config` points at
    pub fn load(config: &AssetConfig) -> Self {
        let overlay = match &config.overlay_image {
            Some(path) => AssetSlot::from_result(load_image(path).map(Arc::new), "overlay image"),
            None => AssetSlot::NotConfigured,
        };
        let bundle = match &config.kernel_bundle {
            Some(path) => AssetSlot::from_result(KernelBundle::from_file(path), "kernel bundle"),
            None => AssetSlot::NotConfigured,
        };
        let color_lut = match &config.color_lut {
            Some(path) => {
                AssetSlot::from_result(ColorCube::from_file(path).map(Arc::new), "color lookup table")
            }
            None => AssetSlot::NotConfigured,
        };

        Self {
            overlay,
            bundle,
            color_lut,
        }
    }

    pub fn with_overlay(mut self, frame: Frame) -> Self {
        self.overlay = AssetSlot::Loaded(Arc::new(frame));
        self
    }

    pub fn with_bundle(mut self, bundle: KernelBundle) -> Self {
        self.bundle = AssetSlot::Loaded(bundle);
        self
    }

    pub fn with_color_lut(mut self, cube: ColorCube) -> Self {
        self.color_lut = AssetSlot::Loaded(Arc::new(cube));
        self
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Decode an image file into a frame
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Frame, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AssetError::Missing {
            name: "image".to_string(),
            path: path.display().to_string(),
        });
    }
    let image = image::open(path).map_err(|e| AssetError::DecodeFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Frame::from_dynamic(&image))
}
