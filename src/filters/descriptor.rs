use crate::filters::kind::FilterKind;
use crate::frame::{Extent, Frame, Point};

/// Grouping used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    ColorEffect,
    Photo,
    Distortion,
    Tile,
    Stylize,
    Blur,
    Geometry,
    Overlay,
    Adjustment,
}

impl FilterCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FilterCategory::ColorEffect => "color",
            FilterCategory::Photo => "photo",
            FilterCategory::Distortion => "distortion",
            FilterCategory::Tile => "tile",
            FilterCategory::Stylize => "stylize",
            FilterCategory::Blur => "blur",
            FilterCategory::Geometry => "geometry",
            FilterCategory::Overlay => "overlay",
            FilterCategory::Adjustment => "adjustment",
        }
    }
}

impl std::fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Range and default of one user-facing parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterSpec {
    pub const fn new(key: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self { key, min, max, default }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp into range; NaN falls back to the default
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// One entry of the filter catalog
///
/// The first parameter, when there is one, is the parameter the user's
/// intensity control drives.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub category: FilterCategory,
    pub parameters: Vec<ParameterSpec>,
    pub kind: FilterKind,
}

impl FilterDescriptor {
    pub fn new(
        name: &'static str,
        label: &'static str,
        category: FilterCategory,
        kind: FilterKind,
    ) -> Self {
        Self {
            name,
            label,
            category,
            parameters: Vec::new(),
            kind,
        }
    }

    /// Append a parameter (builder style)
    pub fn with_param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|spec| spec.key == key)
    }

    /// The parameter bound to the intensity control
    pub fn primary_parameter(&self) -> Option<&ParameterSpec> {
        self.parameters.first()
    }

    /// Kind with `intensity` clamped into the primary parameter and bound to it
    ///
    /// Returns the bound kind and the clamped intensity. Filters without
    /// parameters ignore the intensity and report `0.0`.
    pub fn bind_intensity(&self, intensity: f32) -> (FilterKind, f32) {
        let mut kind = self.kind;
        match self.primary_parameter() {
            Some(spec) => {
                let value = spec.clamp(intensity);
                kind.set_param(spec.key, value);
                (kind, value)
            }
            None => (kind, 0.0),
        }
    }
}

/// Inputs synthesized before a kernel runs
#[derive(Debug, Clone, Default)]
pub struct AuxiliaryInputs {
    /// Checkerboard displacement map covering the input extent
    pub displacement_map: Option<Frame>,
    /// Fixed noise window refracted by the glass filter
    pub texture: Option<Frame>,
    /// Gradient strip read by the color map
    pub gradient: Option<Frame>,
    /// Noise frame composited by the static overlay
    pub noise: Option<Frame>,
    /// Region reported by the detector, if any
    pub region: Option<Extent>,
    /// Center resolved from `region`, or the frame center
    pub center: Option<Point>,
    /// Overlay translation for the glitch effect
    pub offset: Option<Point>,
}

/// Everything needed to run one filter on one frame
///
/// Built fresh for every frame and dropped after the call.
#[derive(Debug, Clone)]
pub struct FilterInvocation<'a> {
    pub descriptor: &'a FilterDescriptor,
    pub kind: FilterKind,
    pub intensity: f32,
    pub aux: AuxiliaryInputs,
}
