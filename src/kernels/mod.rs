//! # Kernel Library
//!
//! Pixel kernels for every filter kind, plus the table that records which
//! kernels could be prepared in this process.
//!
//! Kernels are plain functions from a [`Frame`] and parameters to a new
//! frame. Most need nothing beyond their parameters; a few depend on assets
//! (the glitch overlay image, the region-kernel bundle, a color LUT). The
//! [`KernelLibrary`] is built once from the registry and the loaded assets,
//! before the first frame, and then only read.

pub mod blur;
pub mod color;
pub mod distortion;
pub mod generators;
pub mod lut;
pub mod overlay;
pub mod photo;
pub mod region;
pub mod tile;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::assets::{AssetSlot, AssetStore};
use crate::error::{FilterError, Result};
use crate::filters::{FilterKind, FilterRegistry};
use crate::frame::Frame;

pub use lut::ColorCube;

/// What a kernel needs before it can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelRequirement {
    /// Pure computation
    Native,
    /// The glitch overlay image
    OverlayImage,
    /// A named entry point of the region-kernel bundle
    BundleEntry(&'static str),
    /// A 3D color table
    ColorLut,
}

impl KernelRequirement {
    pub fn of(kind: &FilterKind) -> Self {
        use FilterKind::*;

        match kind {
            Glitch(_) => KernelRequirement::OverlayImage,
            Crosshatch(_) => KernelRequirement::BundleEntry("crosshatch"),
            PolarPixellate(_) => KernelRequirement::BundleEntry("polar_pixellate"),
            FilterKind::ColorCube(_) => KernelRequirement::ColorLut,
            CrossPolynomial(_) | TvStatic(_) | FalseColorCustom(_) | VibranceCustom(_)
            | ColorInvert | ColorMap(_) | ColorMonochrome(_) | ColorPosterize(_) | FalseColor(_)
            | MaskToAlpha | Photo(_) | SepiaTone(_) | Vignette(_) | VignetteEffect(_)
            | Vibrance(_) | BumpDistortion(_) | BumpDistortionLinear(_) | CircleSplash(_)
            | CircularWrap(_) | GlassLozenge(_) | PinchDistortion(_) | StretchCrop(_)
            | TorusLens(_) | Twirl(_) | Vortex(_) | Displacement(_) | Glass(_)
            | TriangleTile(_) | PerspectiveTile(_) | Pointillize(_) | Pixellate(_)
            | MotionBlur(_) | PerspectiveTransform(_) | ColorControls(_) | CameraGrade(_)
            | ColorMatrix(_) => KernelRequirement::Native,
        }
    }
}

/// A kernel ready to execute, holding whatever asset it depends on
#[derive(Debug, Clone)]
pub enum CompiledKernel {
    Native,
    Overlay(Arc<Frame>),
    Bundle { entry: String },
    ColorCube(Arc<ColorCube>),
}

#[derive(Debug, Clone)]
pub enum KernelSlot {
    Ready(CompiledKernel),
    Unavailable { reason: String },
}

impl KernelSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, KernelSlot::Ready(_))
    }
}

/// Immutable table of prepared kernels, keyed by filter name
#[derive(Debug, Clone, Default)]
pub struct KernelLibrary {
    slots: HashMap<String, KernelSlot>,
}

impl KernelLibrary {
    /// Prepare a kernel for every registered filter
    ///
    /// Never fails as a whole: a filter whose asset is missing gets an
    /// `Unavailable` slot and every other filter stays usable.
    pub fn initialize(registry: &FilterRegistry, assets: &AssetStore) -> Self {
        let mut slots = HashMap::with_capacity(registry.len());

        for descriptor in registry.list() {
            let slot = Self::compile(&descriptor.kind, assets);
            if let KernelSlot::Unavailable { reason } = &slot {
                warn!("Filter '{}' disabled: {}", descriptor.name, reason);
            }
            slots.insert(descriptor.name.to_string(), slot);
        }

        let library = Self { slots };
        info!(
            "Kernel library ready: {} of {} filters available",
            library.len() - library.unavailable().len(),
            library.len()
        );
        library
    }

    fn compile(kind: &FilterKind, assets: &AssetStore) -> KernelSlot {
        match KernelRequirement::of(kind) {
            KernelRequirement::Native => KernelSlot::Ready(CompiledKernel::Native),
            KernelRequirement::OverlayImage => match &assets.overlay {
                AssetSlot::Loaded(frame) => KernelSlot::Ready(CompiledKernel::Overlay(Arc::clone(frame))),
                other => KernelSlot::Unavailable {
                    reason: other.describe("overlay image"),
                },
            },
            KernelRequirement::BundleEntry(entry) => match &assets.bundle {
                AssetSlot::Loaded(bundle) if bundle.has_entry(entry) => {
                    KernelSlot::Ready(CompiledKernel::Bundle {
                        entry: entry.to_string(),
                    })
                }
                AssetSlot::Loaded(bundle) => KernelSlot::Unavailable {
                    reason: format!("kernel bundle '{}' has no entry point '{}'", bundle.name, entry),
                },
                other => KernelSlot::Unavailable {
                    reason: other.describe("kernel bundle"),
                },
            },
            KernelRequirement::ColorLut => match &assets.color_lut {
                AssetSlot::Loaded(cube) => KernelSlot::Ready(CompiledKernel::ColorCube(Arc::clone(cube))),
                other => KernelSlot::Unavailable {
                    reason: other.describe("color lookup table"),
                },
            },
        }
    }

    /// Prepared kernel for `name`
    pub fn get(&self, name: &str) -> Result<&CompiledKernel> {
        match self.slots.get(name) {
            Some(KernelSlot::Ready(kernel)) => Ok(kernel),
            Some(KernelSlot::Unavailable { reason }) => Err(FilterError::KernelUnavailable {
                filter: name.to_string(),
                reason: reason.clone(),
            }),
            None => Err(FilterError::KernelUnavailable {
                filter: name.to_string(),
                reason: "no kernel was prepared for this filter".to_string(),
            }),
        }
    }

    pub fn slot(&self, name: &str) -> Option<&KernelSlot> {
        self.slots.get(name)
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.slots.get(name).map_or(false, KernelSlot::is_ready)
    }

    /// Names of disabled filters, sorted
    pub fn unavailable(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| !slot.is_ready())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
