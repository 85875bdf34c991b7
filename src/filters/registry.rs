use std::collections::HashMap;

use crate::{
    error::{FilterError, RegistryError, Result},
    filters::descriptor::{FilterCategory, FilterDescriptor, ParameterSpec},
    filters::kind::*,
    frame::Point,
};

/// Read-only catalog of the available filters
///
/// The catalog is built once, in display order, and handed to the engine and
/// pipeline by reference. There is no way to add or remove filters after
/// construction.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    descriptors: Vec<FilterDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl FilterRegistry {
    /// Create a registry with all built-in filters
    pub fn new() -> Self {
        Self::assemble(builtin_descriptors())
    }

    /// Create a registry from a custom list, checking the catalog invariants
    ///
    /// Names must be unique, every parameter must satisfy
    /// `min <= default <= max`, and every parameter key must exist on the
    /// descriptor's kind.
    pub fn from_descriptors(descriptors: Vec<FilterDescriptor>) -> Result<Self> {
        let mut seen = HashMap::new();

        for descriptor in &descriptors {
            if seen.insert(descriptor.name, ()).is_some() {
                return Err(RegistryError::DuplicateName {
                    name: descriptor.name.to_string(),
                }
                .into());
            }

            for spec in &descriptor.parameters {
                validate_parameter(descriptor, spec)?;
            }
        }

        Ok(Self::assemble(descriptors))
    }

    /// Bind every declared default into its kind and build the name index
    fn assemble(mut descriptors: Vec<FilterDescriptor>) -> Self {
        for descriptor in &mut descriptors {
            let specs = descriptor.parameters.clone();
            for spec in specs {
                descriptor.kind.set_param(spec.key, spec.default);
            }
        }

        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (descriptor.name, i))
            .collect();

        Self { descriptors, index }
    }

    /// All filters in display order
    pub fn list(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    /// Find a filter by its stable name
    pub fn lookup(&self, name: &str) -> Result<&FilterDescriptor> {
        self.index
            .get(name)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| FilterError::unknown_filter(name))
    }

    /// Filter names in display order
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    /// Check if a filter is available
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the number of registered filters
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_parameter(descriptor: &FilterDescriptor, spec: &ParameterSpec) -> Result<()> {
    let invalid = |details: String| RegistryError::InvalidParameter {
        filter: descriptor.name.to_string(),
        key: spec.key.to_string(),
        details,
    };

    if spec.min > spec.max {
        return Err(invalid(format!("min {} exceeds max {}", spec.min, spec.max)).into());
    }
    if !spec.contains(spec.default) {
        return Err(invalid(format!(
            "default {} outside [{}, {}]",
            spec.default, spec.min, spec.max
        ))
        .into());
    }
    if descriptor.kind.param(spec.key).is_none() {
        return Err(invalid("not a parameter of this filter kind".to_string()).into());
    }
    Ok(())
}

/// The built-in catalog, in display order
pub fn builtin_descriptors() -> Vec<FilterDescriptor> {
    use FilterCategory::*;

    vec![
        FilterDescriptor::new(
            "cross_polynomial",
            "Green Channel",
            ColorEffect,
            FilterKind::CrossPolynomial(CrossPolynomialParams::default()),
        ),
        FilterDescriptor::new(
            "tv_static",
            "TV Static",
            Overlay,
            FilterKind::TvStatic(StaticParams { opacity: 0.5 }),
        )
        .with_param(ParameterSpec::new("opacity", 0.0, 1.0, 0.5)),
        FilterDescriptor::new(
            "false_color_custom",
            "False Color (Custom)",
            ColorEffect,
            FilterKind::FalseColorCustom(FalseColorParams::default()),
        ),
        FilterDescriptor::new(
            "vibrance_custom",
            "Vibrance (Custom)",
            ColorEffect,
            FilterKind::VibranceCustom(VibranceParams { amount: 1.0 }),
        )
        .with_param(ParameterSpec::new("vibrance", -1.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "glitch",
            "Glitch",
            Overlay,
            FilterKind::Glitch(GlitchParams { opacity: 0.7 }),
        )
        .with_param(ParameterSpec::new("opacity", 0.0, 1.0, 0.7)),
        FilterDescriptor::new("color_invert", "Color Invert", ColorEffect, FilterKind::ColorInvert),
        FilterDescriptor::new(
            "color_map",
            "Color Map",
            ColorEffect,
            FilterKind::ColorMap(ColorMapParams { intensity: 1.0 }),
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "color_monochrome",
            "Color Monochrome",
            ColorEffect,
            FilterKind::ColorMonochrome(MonochromeParams {
                color: [0.7, 0.7, 0.7],
                intensity: 1.0,
            }),
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "color_posterize",
            "Color Posterize",
            ColorEffect,
            FilterKind::ColorPosterize(PosterizeParams { levels: 6.0 }),
        )
        .with_param(ParameterSpec::new("levels", 2.0, 30.0, 6.0)),
        FilterDescriptor::new(
            "false_color",
            "False Color",
            ColorEffect,
            FilterKind::FalseColor(FalseColorParams::default()),
        ),
        FilterDescriptor::new("mask_to_alpha", "Mask to Alpha", ColorEffect, FilterKind::MaskToAlpha),
        photo("photo_chrome", "Chrome", PhotoEffect::Chrome),
        photo("photo_fade", "Fade", PhotoEffect::Fade),
        photo("photo_instant", "Instant", PhotoEffect::Instant),
        photo("photo_mono", "Mono", PhotoEffect::Mono),
        photo("photo_noir", "Noir", PhotoEffect::Noir),
        photo("photo_process", "Process", PhotoEffect::Process),
        photo("photo_tonal", "Tonal", PhotoEffect::Tonal),
        photo("photo_transfer", "Transfer", PhotoEffect::Transfer),
        FilterDescriptor::new(
            "sepia_tone",
            "Sepia Tone",
            Photo,
            FilterKind::SepiaTone(SepiaParams { intensity: 1.0 }),
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "vignette",
            "Vignette",
            Photo,
            FilterKind::Vignette(VignetteParams { intensity: 1.0, radius: 2.0 }),
        )
        .with_param(ParameterSpec::new("intensity", -1.0, 1.0, 1.0))
        .with_param(ParameterSpec::new("radius", 0.0, 2.0, 2.0)),
        FilterDescriptor::new(
            "vignette_effect",
            "Vignette Effect",
            Photo,
            FilterKind::VignetteEffect(VignetteEffectParams {
                center: None,
                radius: 150.0,
                intensity: 1.0,
                falloff: 0.5,
            }),
        )
        .with_param(ParameterSpec::new("intensity", -1.0, 1.0, 1.0))
        .with_param(ParameterSpec::new("radius", 0.0, 2000.0, 150.0))
        .with_param(ParameterSpec::new("falloff", 0.0, 1.0, 0.5)),
        FilterDescriptor::new(
            "vibrance",
            "Vibrance",
            Adjustment,
            FilterKind::Vibrance(VibranceParams { amount: 1.0 }),
        )
        .with_param(ParameterSpec::new("amount", -1.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "bump_distortion",
            "Bump",
            Distortion,
            FilterKind::BumpDistortion(RadialDistortionParams {
                center: Point::new(150.0, 150.0),
                radius: 300.0,
                scale: 0.5,
            }),
        )
        .with_param(ParameterSpec::new("scale", -1.0, 1.0, 0.5))
        .with_param(ParameterSpec::new("radius", 0.0, 600.0, 300.0)),
        FilterDescriptor::new(
            "bump_distortion_linear",
            "Linear Bump",
            Distortion,
            FilterKind::BumpDistortionLinear(LinearBumpParams {
                center: Point::new(150.0, 150.0),
                radius: 300.0,
                angle: 0.0,
                scale: 0.5,
            }),
        )
        .with_param(ParameterSpec::new("scale", -1.0, 1.0, 0.5))
        .with_param(ParameterSpec::new("radius", 0.0, 600.0, 300.0))
        .with_param(ParameterSpec::new("angle", -3.14, 3.14, 0.0)),
        FilterDescriptor::new(
            "circle_splash_distortion",
            "Circle Splash",
            Distortion,
            FilterKind::CircleSplash(CircleSplashParams {
                center: None,
                radius: 200.0,
            }),
        )
        .with_param(ParameterSpec::new("radius", 0.0, 1000.0, 200.0)),
        FilterDescriptor::new(
            "circular_wrap",
            "Circular Wrap",
            Distortion,
            FilterKind::CircularWrap(CircularWrapParams {
                center: Point::new(150.0, 150.0),
                radius: 150.0,
                angle: 0.0,
            }),
        )
        .with_param(ParameterSpec::new("radius", 0.0, 600.0, 150.0))
        .with_param(ParameterSpec::new("angle", -3.14, 3.14, 0.0)),
        FilterDescriptor::new(
            "glass_lozenge",
            "Glass Lozenge",
            Distortion,
            FilterKind::GlassLozenge(GlassLozengeParams {
                point0: Point::new(100.0, 100.0),
                point1: Point::new(300.0, 300.0),
                radius: 100.0,
                refraction: 1.7,
            }),
        )
        .with_param(ParameterSpec::new("radius", 0.0, 1000.0, 100.0))
        .with_param(ParameterSpec::new("refraction", 0.0, 5.0, 1.7)),
        FilterDescriptor::new(
            "pinch_distortion",
            "Pinch",
            Distortion,
            FilterKind::PinchDistortion(RadialDistortionParams {
                center: Point::new(150.0, 150.0),
                radius: 300.0,
                scale: 0.5,
            }),
        )
        .with_param(ParameterSpec::new("scale", 0.0, 2.0, 0.5))
        .with_param(ParameterSpec::new("radius", 0.0, 1000.0, 300.0)),
        FilterDescriptor::new(
            "stretch_crop",
            "Stretch Crop",
            Distortion,
            FilterKind::StretchCrop(StretchCropParams {
                crop_amount: 0.25,
                center_stretch: 0.25,
            }),
        )
        .with_param(ParameterSpec::new("crop_amount", 0.0, 1.0, 0.25))
        .with_param(ParameterSpec::new("center_stretch", 0.0, 1.0, 0.25)),
        FilterDescriptor::new(
            "torus_lens_distortion",
            "Torus Lens",
            Distortion,
            FilterKind::TorusLens(TorusLensParams {
                center: Point::new(150.0, 150.0),
                radius: 160.0,
                width: 80.0,
                refraction: 1.7,
            }),
        )
        .with_param(ParameterSpec::new("radius", 0.0, 500.0, 160.0))
        .with_param(ParameterSpec::new("width", 0.0, 200.0, 80.0))
        .with_param(ParameterSpec::new("refraction", 0.0, 5.0, 1.7)),
        FilterDescriptor::new(
            "twirl_distortion",
            "Twirl",
            Distortion,
            FilterKind::Twirl(SwirlParams {
                center: None,
                radius: 200.0,
                angle: 3.14,
            }),
        )
        .with_param(ParameterSpec::new("angle", -12.57, 12.57, 3.14))
        .with_param(ParameterSpec::new("radius", 0.0, 500.0, 200.0)),
        FilterDescriptor::new(
            "vortex_distortion",
            "Vortex",
            Distortion,
            FilterKind::Vortex(SwirlParams {
                center: Some(Point::new(500.0, 500.0)),
                radius: 200.0,
                angle: 3.14,
            }),
        )
        .with_param(ParameterSpec::new("angle", -94.25, 94.25, 3.14))
        .with_param(ParameterSpec::new("radius", 0.0, 800.0, 200.0)),
        FilterDescriptor::new(
            "displacement_distortion",
            "Displacement",
            Distortion,
            FilterKind::Displacement(DisplacementParams { scale: 100.0 }),
        )
        .with_param(ParameterSpec::new("scale", 0.0, 200.0, 100.0)),
        FilterDescriptor::new(
            "glass_distortion",
            "Glass",
            Distortion,
            FilterKind::Glass(GlassParams { scale: 500.0 }),
        )
        .with_param(ParameterSpec::new("scale", 0.001, 500.0, 500.0)),
        FilterDescriptor::new(
            "triangle_tile",
            "Triangle Tile",
            Tile,
            FilterKind::TriangleTile(TriangleTileParams {
                center: Point::new(150.0, 150.0),
                angle: 0.0,
                width: 100.0,
            }),
        )
        .with_param(ParameterSpec::new("width", 1.0, 500.0, 100.0))
        .with_param(ParameterSpec::new("angle", -3.14, 3.14, 0.0)),
        FilterDescriptor::new(
            "perspective_tile",
            "Perspective Tile",
            Tile,
            FilterKind::PerspectiveTile(PerspectiveParams::default()),
        ),
        FilterDescriptor::new(
            "pointillize",
            "Pointillize",
            Stylize,
            FilterKind::Pointillize(PointillizeParams {
                center: Point::new(150.0, 150.0),
                radius: 20.0,
            }),
        )
        .with_param(ParameterSpec::new("radius", 1.0, 100.0, 20.0)),
        FilterDescriptor::new(
            "pixellate",
            "Pixellate",
            Stylize,
            FilterKind::Pixellate(PixellateParams {
                center: Point::new(150.0, 150.0),
                scale: 8.0,
            }),
        )
        .with_param(ParameterSpec::new("scale", 1.0, 100.0, 8.0)),
        FilterDescriptor::new(
            "motion_blur",
            "Motion Blur",
            Blur,
            FilterKind::MotionBlur(MotionBlurParams {
                radius: 20.0,
                angle: 0.0,
            }),
        )
        .with_param(ParameterSpec::new("radius", 0.0, 100.0, 20.0))
        .with_param(ParameterSpec::new("angle", -3.14, 3.14, 0.0)),
        FilterDescriptor::new(
            "perspective_transform",
            "Perspective",
            Geometry,
            FilterKind::PerspectiveTransform(PerspectiveParams::default()),
        ),
        FilterDescriptor::new(
            "crosshatch",
            "Crosshatch",
            Stylize,
            FilterKind::Crosshatch(CrosshatchParams {
                spacing: 0.01,
                line_width: 0.003,
            }),
        )
        .with_param(ParameterSpec::new("spacing", 0.002, 0.1, 0.01))
        .with_param(ParameterSpec::new("line_width", 0.0005, 0.02, 0.003)),
        FilterDescriptor::new(
            "polar_pixellate",
            "Polar Pixellate",
            Stylize,
            FilterKind::PolarPixellate(PolarPixellateParams {
                radial_block: 0.05,
                angular_block: 0.03,
                center: Point::new(0.35, 0.55),
            }),
        )
        .with_param(ParameterSpec::new("radial_block", 0.005, 0.5, 0.05))
        .with_param(ParameterSpec::new("angular_block", 0.005, 1.0, 0.03)),
        FilterDescriptor::new(
            "color_controls",
            "Color Controls",
            Adjustment,
            FilterKind::ColorControls(ColorControlsParams {
                saturation: 1.0,
                brightness: 0.0,
                contrast: 1.0,
            }),
        )
        .with_param(ParameterSpec::new("saturation", 0.0, 2.0, 1.0))
        .with_param(ParameterSpec::new("brightness", -1.0, 1.0, 0.0))
        .with_param(ParameterSpec::new("contrast", 0.25, 4.0, 1.0)),
        FilterDescriptor::new(
            "camera_grade",
            "Camera Grade",
            Adjustment,
            FilterKind::CameraGrade(CameraGradeParams { intensity: 1.0 }),
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "color_matrix",
            "Color Matrix",
            Adjustment,
            FilterKind::ColorMatrix(ColorMatrixParams::default()),
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0)),
        FilterDescriptor::new(
            "color_cube",
            "Color Cube (LUT)",
            Adjustment,
            FilterKind::ColorCube(ColorCubeParams { intensity: 1.0 }),
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0)),
    ]
}

fn photo(name: &'static str, label: &'static str, effect: PhotoEffect) -> FilterDescriptor {
    FilterDescriptor::new(name, label, FilterCategory::Photo, FilterKind::Photo(effect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_validates() {
        let registry = FilterRegistry::from_descriptors(builtin_descriptors());
        assert!(registry.is_ok());
        assert_eq!(registry.unwrap().len(), 47);
    }

    #[test]
    fn test_defaults_within_range_for_every_filter() {
        let registry = FilterRegistry::new();

        for name in registry.names() {
            let descriptor = registry.lookup(name).unwrap();
            for spec in &descriptor.parameters {
                assert!(
                    spec.min <= spec.default && spec.default <= spec.max,
                    "{}.{} default out of range",
                    name,
                    spec.key
                );
                assert_eq!(descriptor.kind.param(spec.key), Some(spec.default));
            }
        }
    }

    #[test]
    fn test_display_order_is_stable() {
        let first = FilterRegistry::new().names();
        let second = FilterRegistry::new().names();

        assert_eq!(first, second);
        assert_eq!(first[0], "cross_polynomial");
        assert_eq!(first[1], "tv_static");
        assert_eq!(*first.last().unwrap(), "color_cube");
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = FilterRegistry::new();

        assert!(registry.contains("sepia_tone"));
        match registry.lookup("sparkle") {
            Err(FilterError::UnknownFilter { name }) => assert_eq!(name, "sparkle"),
            other => panic!("expected UnknownFilter, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_established_defaults() {
        let registry = FilterRegistry::new();

        let posterize = registry.lookup("color_posterize").unwrap();
        assert_eq!(posterize.kind.param("levels"), Some(6.0));

        let vignette = registry.lookup("vignette").unwrap();
        assert_eq!(vignette.kind.param("radius"), Some(2.0));
        assert_eq!(vignette.kind.param("intensity"), Some(1.0));

        match registry.lookup("color_monochrome").unwrap().kind {
            FilterKind::ColorMonochrome(p) => {
                assert_eq!(p.intensity, 1.0);
                assert_eq!(p.color, [0.7, 0.7, 0.7]);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_distortions_follow_camera_order() {
        let names = FilterRegistry::new().names();
        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();

        let distortions = [
            "bump_distortion",
            "bump_distortion_linear",
            "circle_splash_distortion",
            "circular_wrap",
            "glass_lozenge",
            "pinch_distortion",
            "stretch_crop",
            "torus_lens_distortion",
            "twirl_distortion",
            "vortex_distortion",
            "displacement_distortion",
            "glass_distortion",
            "triangle_tile",
            "perspective_tile",
            "pointillize",
            "pixellate",
            "motion_blur",
            "perspective_transform",
        ];
        for pair in distortions.windows(2) {
            assert_eq!(position(pair[0]) + 1, position(pair[1]), "{:?}", pair);
        }
        assert_eq!(position("color_invert") + 1, position("color_map"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let descriptors = vec![
            FilterDescriptor::new("a", "A", FilterCategory::ColorEffect, FilterKind::ColorInvert),
            FilterDescriptor::new("a", "A again", FilterCategory::ColorEffect, FilterKind::MaskToAlpha),
        ];

        match FilterRegistry::from_descriptors(descriptors) {
            Err(FilterError::Registry(RegistryError::DuplicateName { name })) => assert_eq!(name, "a"),
            other => panic!("expected DuplicateName, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_out_of_range_default_rejected() {
        let descriptors = vec![FilterDescriptor::new(
            "posterize",
            "Posterize",
            FilterCategory::ColorEffect,
            FilterKind::ColorPosterize(PosterizeParams { levels: 6.0 }),
        )
        .with_param(ParameterSpec::new("levels", 2.0, 30.0, 64.0))];

        assert!(matches!(
            FilterRegistry::from_descriptors(descriptors),
            Err(FilterError::Registry(RegistryError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn test_unknown_parameter_key_rejected() {
        let descriptors = vec![FilterDescriptor::new(
            "invert",
            "Invert",
            FilterCategory::ColorEffect,
            FilterKind::ColorInvert,
        )
        .with_param(ParameterSpec::new("intensity", 0.0, 1.0, 1.0))];

        assert!(FilterRegistry::from_descriptors(descriptors).is_err());
    }
}
