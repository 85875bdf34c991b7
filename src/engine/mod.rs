//! # Filter Application Engine
//!
//! Turns "apply filter X at intensity I to this frame" into a finished frame.
//!
//! Each call resolves the prepared kernel, builds a [`FilterInvocation`]
//! (intensity clamped and bound, auxiliary inputs synthesized), runs the
//! kernel and crops the result to the input extent. The engine holds no
//! per-frame state and can be shared between threads.

mod detector;

pub use detector::{FixedRegionDetector, NoRegionDetector, RegionDetector};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::{
    composition::{Compositor, FitPolicy},
    config::EngineConfig,
    error::{FilterError, Result},
    filters::{AuxiliaryInputs, FilterDescriptor, FilterInvocation, FilterKind, FilterRegistry},
    frame::{Extent, Frame, Point},
    kernels::{blur, color, distortion, generators, overlay, photo, region, tile, CompiledKernel, KernelLibrary},
};

/// Center of a region, or of the whole frame when nothing was detected
pub fn region_center(frame: &Frame, region: Option<Extent>) -> Point {
    match region {
        Some(region) => region.center(),
        None => frame.extent().center(),
    }
}

pub struct FilterEngine {
    kernels: KernelLibrary,
    compositor: Compositor,
    detector: Box<dyn RegionDetector>,
    config: EngineConfig,
}

impl FilterEngine {
    /// Engine without region detection
    pub fn new(kernels: KernelLibrary, config: EngineConfig) -> Self {
        Self {
            kernels,
            compositor: Compositor::new(FitPolicy::Stretch),
            detector: Box::new(NoRegionDetector),
            config,
        }
    }

    /// Replace the region detector (builder style)
    pub fn with_detector<D: RegionDetector + 'static>(mut self, detector: D) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn kernels(&self) -> &KernelLibrary {
        &self.kernels
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn rng(&self) -> SmallRng {
        match self.config.random_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    /// Apply `descriptor` to `frame` at `intensity`
    ///
    /// The result always covers exactly the input extent. Errors mean the
    /// filter could not run; callers that must always show a frame use
    /// [`apply_or_passthrough`](Self::apply_or_passthrough).
    pub fn apply(&self, frame: &Frame, descriptor: &FilterDescriptor, intensity: f32) -> Result<Frame> {
        let mut rng = self.rng();
        self.apply_with_rng(frame, descriptor, intensity, &mut rng)
    }

    /// Like [`apply`](Self::apply), drawing randomness from `rng`
    pub fn apply_with_rng<R: Rng + ?Sized>(
        &self,
        frame: &Frame,
        descriptor: &FilterDescriptor,
        intensity: f32,
        rng: &mut R,
    ) -> Result<Frame> {
        let kernel = self.kernels.get(descriptor.name)?;
        if frame.is_empty() {
            return Ok(frame.clone());
        }

        let invocation = self.prepare(frame, descriptor, intensity, rng);
        debug!(
            "Applying '{}' at {:.3} to {}x{} frame",
            descriptor.name,
            invocation.intensity,
            frame.width(),
            frame.height()
        );
        self.run(frame, &invocation, kernel)
    }

    /// Look `name` up in `registry` and apply it
    pub fn apply_by_name(
        &self,
        registry: &FilterRegistry,
        frame: &Frame,
        name: &str,
        intensity: f32,
    ) -> Result<Frame> {
        let descriptor = registry.lookup(name)?;
        self.apply(frame, descriptor, intensity)
    }

    /// Apply `name`, handing back the unmodified input if anything fails
    pub fn apply_or_passthrough(
        &self,
        registry: &FilterRegistry,
        frame: &Frame,
        name: &str,
        intensity: f32,
    ) -> Frame {
        match self.apply_by_name(registry, frame, name, intensity) {
            Ok(output) => output,
            Err(e) => {
                warn!("Passing frame through unfiltered: {}", e);
                frame.clone()
            }
        }
    }

    /// Bind the intensity and synthesize the auxiliary inputs for one frame
    pub fn prepare<'a, R: Rng + ?Sized>(
        &self,
        frame: &Frame,
        descriptor: &'a FilterDescriptor,
        intensity: f32,
        rng: &mut R,
    ) -> FilterInvocation<'a> {
        use FilterKind::*;

        let (kind, intensity) = descriptor.bind_intensity(intensity);
        let extent = frame.extent();
        let mut aux = AuxiliaryInputs::default();

        match kind {
            TvStatic(_) => {
                aux.noise = Some(generators::static_noise(rng, &self.config, extent));
            }
            Glitch(_) => {
                aux.offset = Some(generators::glitch_offset(rng, &self.config));
            }
            ColorMap(_) => {
                aux.gradient = Some(generators::color_map_gradient());
            }
            Displacement(_) => {
                aux.displacement_map = Some(generators::checkerboard(extent));
            }
            Glass(_) => {
                aux.texture = Some(generators::glass_texture(extent));
            }
            CircleSplash(_) | Twirl(_) => {
                let region = self.detector.detect(frame);
                if region.is_none() {
                    let missing = FilterError::AuxiliaryInputMissing {
                        filter: descriptor.name.to_string(),
                        input: "region".to_string(),
                    };
                    debug!("{}; centering on the frame", missing);
                }
                aux.region = region;
                aux.center = Some(region_center(frame, region));
            }
            CrossPolynomial(_) | FalseColorCustom(_) | VibranceCustom(_) | ColorInvert
            | ColorMonochrome(_) | ColorPosterize(_) | FalseColor(_) | MaskToAlpha | Photo(_)
            | SepiaTone(_) | Vignette(_) | VignetteEffect(_) | Vibrance(_) | BumpDistortion(_)
            | BumpDistortionLinear(_) | CircularWrap(_) | GlassLozenge(_) | PinchDistortion(_)
            | StretchCrop(_) | TorusLens(_) | Vortex(_) | TriangleTile(_) | PerspectiveTile(_)
            | Pointillize(_) | Pixellate(_) | MotionBlur(_) | PerspectiveTransform(_)
            | Crosshatch(_) | PolarPixellate(_) | ColorControls(_) | CameraGrade(_)
            | ColorMatrix(_) | ColorCube(_) => {}
        }

        FilterInvocation {
            descriptor,
            kind,
            intensity,
            aux,
        }
    }

    /// Run a prepared invocation
    pub fn execute(&self, frame: &Frame, invocation: &FilterInvocation<'_>) -> Result<Frame> {
        let kernel = self.kernels.get(invocation.descriptor.name)?;
        self.run(frame, invocation, kernel)
    }

    fn run(&self, frame: &Frame, invocation: &FilterInvocation<'_>, kernel: &CompiledKernel) -> Result<Frame> {
        use FilterKind::*;

        let name = invocation.descriptor.name;
        let aux = &invocation.aux;
        let missing = |input: &str| FilterError::AuxiliaryInputMissing {
            filter: name.to_string(),
            input: input.to_string(),
        };
        let mismatch = || FilterError::KernelUnavailable {
            filter: name.to_string(),
            reason: "prepared kernel does not match the filter kind".to_string(),
        };
        let center = |explicit: Option<Point>| explicit.or(aux.center).unwrap_or_else(|| frame.extent().center());

        let output = match invocation.kind {
            TvStatic(p) => {
                let noise = aux.noise.as_ref().ok_or_else(|| missing("noise"))?;
                // Extent-preserving through the compositor, no crop needed
                return Ok(self.compositor.composite(frame, noise, p.opacity));
            }
            CrossPolynomial(p) => color::cross_polynomial(frame, &p),
            FalseColorCustom(p) | FalseColor(p) => color::false_color(frame, &p),
            VibranceCustom(p) => color::vibrance_custom(frame, p.amount),
            Glitch(p) => match kernel {
                CompiledKernel::Overlay(image) => {
                    let offset = aux.offset.unwrap_or(Point::new(0.0, 0.0));
                    overlay::glitch(frame, image, p.opacity, offset)
                }
                _ => return Err(mismatch()),
            },
            ColorInvert => color::invert(frame),
            ColorMap(p) => {
                let gradient = aux.gradient.as_ref().ok_or_else(|| missing("gradient"))?;
                color::color_map(frame, gradient, p.intensity)
            }
            ColorMonochrome(p) => color::monochrome(frame, &p),
            ColorPosterize(p) => color::posterize(frame, p.levels),
            MaskToAlpha => color::mask_to_alpha(frame),
            Photo(effect) => photo::photo_effect(frame, effect),
            SepiaTone(p) => photo::sepia(frame, p.intensity),
            Vignette(p) => photo::vignette(frame, &p),
            VignetteEffect(p) => photo::vignette_effect(frame, &p),
            Vibrance(p) => color::vibrance(frame, p.amount),
            BumpDistortion(p) => distortion::bump(frame, &p),
            BumpDistortionLinear(p) => distortion::bump_linear(frame, &p),
            CircleSplash(p) => distortion::circle_splash(frame, &p, center(p.center)),
            CircularWrap(p) => distortion::circular_wrap(frame, &p),
            GlassLozenge(p) => distortion::glass_lozenge(frame, &p),
            PinchDistortion(p) => distortion::pinch(frame, &p),
            StretchCrop(p) => distortion::stretch_crop(frame, &p),
            TorusLens(p) => distortion::torus_lens(frame, &p),
            Twirl(p) => distortion::twirl(frame, &p, center(p.center)),
            Vortex(p) => {
                let at = p.center.unwrap_or_else(|| frame.extent().center());
                distortion::vortex(frame, &p, at)
            }
            Displacement(p) => {
                let map = aux.displacement_map.as_ref().ok_or_else(|| missing("displacement_map"))?;
                distortion::displacement(frame, map, p.scale)
            }
            Glass(p) => {
                let texture = aux.texture.as_ref().ok_or_else(|| missing("texture"))?;
                distortion::glass(frame, texture, p.scale)
            }
            TriangleTile(p) => tile::triangle_tile(frame, &p),
            PerspectiveTile(p) => tile::perspective_tile(frame, &p),
            Pointillize(p) => region::pointillize(frame, &p),
            Pixellate(p) => region::pixellate(frame, &p),
            MotionBlur(p) => blur::motion_blur(frame, &p),
            PerspectiveTransform(p) => tile::perspective_transform(frame, &p),
            Crosshatch(p) => match kernel {
                CompiledKernel::Bundle { .. } => region::crosshatch(frame, &p),
                _ => return Err(mismatch()),
            },
            PolarPixellate(p) => match kernel {
                CompiledKernel::Bundle { .. } => region::polar_pixellate(frame, &p),
                _ => return Err(mismatch()),
            },
            ColorControls(p) => color::color_controls(frame, &p),
            CameraGrade(p) => photo::camera_grade(frame, p.intensity),
            ColorMatrix(p) => color::color_matrix(frame, &p),
            ColorCube(p) => match kernel {
                CompiledKernel::ColorCube(cube) => cube.apply(frame, p.intensity),
                _ => return Err(mismatch()),
            },
        };

        Ok(output.cropped(frame.extent()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetStore, KernelBundle};
    use crate::kernels::ColorCube;
    use image::{ImageBuffer, Rgba};

    fn full_assets() -> AssetStore {
        AssetStore::empty()
            .with_overlay(Frame::new_filled(32, 32, [1.0, 0.0, 1.0, 1.0]))
            .with_bundle(KernelBundle::builtin())
            .with_color_lut(ColorCube::identity(8).unwrap())
    }

    fn engine_with(assets: &AssetStore, seed: Option<u64>) -> (FilterRegistry, FilterEngine) {
        let registry = FilterRegistry::new();
        let kernels = KernelLibrary::initialize(&registry, assets);
        let config = EngineConfig {
            random_seed: seed,
            ..EngineConfig::default()
        };
        (registry, FilterEngine::new(kernels, config))
    }

    fn test_frame() -> Frame {
        Frame::new(ImageBuffer::from_fn(64, 48, |x, y| {
            Rgba([x as f32 / 64.0, y as f32 / 48.0, 0.5, 1.0])
        }))
        .moved_to(7, -3)
    }

    #[test]
    fn test_every_filter_preserves_extent() {
        let (registry, engine) = engine_with(&full_assets(), Some(9));
        let frame = test_frame();

        for descriptor in registry.list() {
            let default = descriptor.primary_parameter().map_or(0.0, |spec| spec.default);
            let output = engine
                .apply(&frame, descriptor, default)
                .unwrap_or_else(|e| panic!("{} failed: {}", descriptor.name, e));
            assert_eq!(output.extent(), frame.extent(), "{}", descriptor.name);
        }
    }

    #[test]
    fn test_glitch_offset_within_limit() {
        let (registry, engine) = engine_with(&full_assets(), None);
        let descriptor = registry.lookup("glitch").unwrap();
        let frame = test_frame();
        let mut rng = SmallRng::seed_from_u64(77);
        let max = engine.config().glitch_max_offset;

        for _ in 0..300 {
            let invocation = engine.prepare(&frame, descriptor, 0.7, &mut rng);
            let offset = invocation.aux.offset.unwrap();
            assert!((-max..=max).contains(&offset.x), "{:?}", offset);
            assert!((-max..=max).contains(&offset.y), "{:?}", offset);
        }
    }

    #[test]
    fn test_bad_glitch_limit_does_not_panic() {
        let registry = FilterRegistry::new();
        let frame = test_frame();

        for max in [-5.0, f32::NAN] {
            let kernels = KernelLibrary::initialize(&registry, &full_assets());
            let config = EngineConfig {
                glitch_max_offset: max,
                ..EngineConfig::default()
            };
            let engine = FilterEngine::new(kernels, config);

            let output = engine.apply_or_passthrough(&registry, &frame, "glitch", 0.7);
            assert_eq!(output.extent(), frame.extent());
            assert!(engine.apply_by_name(&registry, &frame, "glitch", 0.7).is_ok());
        }
    }

    #[test]
    fn test_prepared_textures() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let frame = test_frame();
        let mut rng = SmallRng::seed_from_u64(0);

        let glass = engine.prepare(&frame, registry.lookup("glass_distortion").unwrap(), 500.0, &mut rng);
        let texture = glass.aux.texture.unwrap();
        assert_eq!(texture.extent(), frame.extent());
        assert_eq!(texture.as_image().as_raw(), generators::glass_texture(frame.extent()).as_image().as_raw());

        let map = engine.prepare(&frame, registry.lookup("color_map").unwrap(), 1.0, &mut rng);
        assert!(map.aux.gradient.is_some());
    }

    #[test]
    fn test_color_matrix_end_to_end() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let frame = Frame::new_filled(8, 8, [0.2, 0.3, 0.4, 0.5]);

        let full = engine.apply_by_name(&registry, &frame, "color_matrix", 1.0).unwrap();
        let p = full.pixel(3, 3);
        assert!((p[0] - 0.5).abs() < 1e-6);
        assert!((p[2] - 0.7).abs() < 1e-6);

        let none = engine.apply_by_name(&registry, &frame, "color_matrix", 0.0).unwrap();
        assert_eq!(none.as_image().as_raw(), frame.as_image().as_raw());
    }

    #[test]
    fn test_monochrome_end_to_end() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let gray = Frame::new_filled(100, 100, [0.5, 0.5, 0.5, 1.0]);

        let output = engine
            .apply_by_name(&registry, &gray, "color_monochrome", 1.0)
            .unwrap();

        assert_eq!(output.extent(), gray.extent());
        for p in output.as_image().pixels() {
            for c in 0..3 {
                assert!((p.0[c] - 0.7).abs() < 1e-5);
            }
            assert_eq!(p.0[3], 1.0);
        }
    }

    #[test]
    fn test_unknown_filter_passes_through_twice() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let frame = test_frame();

        assert!(matches!(
            engine.apply_by_name(&registry, &frame, "no_such_filter", 1.0),
            Err(FilterError::UnknownFilter { .. })
        ));

        let once = engine.apply_or_passthrough(&registry, &frame, "no_such_filter", 1.0);
        let twice = engine.apply_or_passthrough(&registry, &once, "no_such_filter", 1.0);
        assert_eq!(once.extent(), frame.extent());
        assert_eq!(once.as_image().as_raw(), frame.as_image().as_raw());
        assert_eq!(twice.as_image().as_raw(), frame.as_image().as_raw());
    }

    #[test]
    fn test_unavailable_kernel_passes_through() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let frame = test_frame();

        assert!(matches!(
            engine.apply_by_name(&registry, &frame, "glitch", 0.7),
            Err(FilterError::KernelUnavailable { .. })
        ));
        let output = engine.apply_or_passthrough(&registry, &frame, "glitch", 0.7);
        assert_eq!(output.as_image().as_raw(), frame.as_image().as_raw());

        // Other filters keep working
        assert!(engine.apply_by_name(&registry, &frame, "color_invert", 0.0).is_ok());
    }

    #[test]
    fn test_seeded_engine_is_deterministic() {
        let (registry, engine) = engine_with(&full_assets(), Some(1234));
        let frame = test_frame();

        for name in ["tv_static", "glitch"] {
            let a = engine.apply_by_name(&registry, &frame, name, 0.5).unwrap();
            let b = engine.apply_by_name(&registry, &frame, name, 0.5).unwrap();
            assert_eq!(a.as_image().as_raw(), b.as_image().as_raw(), "{}", name);
        }
    }

    #[test]
    fn test_static_zero_opacity_is_identity() {
        let (registry, engine) = engine_with(&AssetStore::empty(), Some(3));
        let frame = test_frame();
        let output = engine.apply_by_name(&registry, &frame, "tv_static", 0.0).unwrap();
        assert_eq!(output.as_image().as_raw(), frame.as_image().as_raw());
    }

    #[test]
    fn test_intensity_is_clamped_into_range() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let descriptor = registry.lookup("color_posterize").unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let invocation = engine.prepare(&test_frame(), descriptor, 99.0, &mut rng);

        assert_eq!(invocation.intensity, 30.0);
        assert_eq!(invocation.kind.param("levels"), Some(30.0));
    }

    #[test]
    fn test_region_center_fallback() {
        let frame = Frame::new_filled(100, 60, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(region_center(&frame, None), Point::new(50.0, 30.0));
        assert_eq!(
            region_center(&frame, Some(Extent::new(10, 10, 20, 20))),
            Point::new(20.0, 20.0)
        );
    }

    #[test]
    fn test_twirl_uses_detected_region() {
        let registry = FilterRegistry::new();
        let kernels = KernelLibrary::initialize(&registry, &AssetStore::empty());
        let engine = FilterEngine::new(kernels, EngineConfig::default())
            .with_detector(FixedRegionDetector::new(Extent::new(10, 10, 20, 20)));
        let descriptor = registry.lookup("twirl_distortion").unwrap();
        let mut rng = SmallRng::seed_from_u64(0);

        let invocation = engine.prepare(&test_frame(), descriptor, 3.14, &mut rng);
        assert_eq!(invocation.aux.region, Some(Extent::new(10, 10, 20, 20)));
        assert_eq!(invocation.aux.center, Some(Point::new(20.0, 20.0)));
    }

    #[test]
    fn test_missing_region_falls_back_to_frame_center() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let descriptor = registry.lookup("circle_splash_distortion").unwrap();
        let frame = test_frame();
        let mut rng = SmallRng::seed_from_u64(0);

        let invocation = engine.prepare(&frame, descriptor, 200.0, &mut rng);
        assert_eq!(invocation.aux.region, None);
        assert_eq!(invocation.aux.center, Some(frame.extent().center()));
        assert!(engine.execute(&frame, &invocation).is_ok());
    }

    #[test]
    fn test_cross_polynomial_through_engine() {
        let (registry, engine) = engine_with(&AssetStore::empty(), None);
        let frame = test_frame();
        let output = engine.apply_by_name(&registry, &frame, "cross_polynomial", 0.0).unwrap();

        for (input, out) in frame.as_image().pixels().zip(output.as_image().pixels()) {
            assert_eq!(out.0, [0.0, input.0[1], 0.0, input.0[3]]);
        }
    }
}
