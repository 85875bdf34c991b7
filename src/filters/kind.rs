use crate::frame::Point;

/// Coefficients of a cross-polynomial channel
///
/// Term order: r, g, b, r², g², b², rg, gb, br, 1.
pub type PolynomialCoefficients = [f32; 10];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossPolynomialParams {
    pub red: PolynomialCoefficients,
    pub green: PolynomialCoefficients,
    pub blue: PolynomialCoefficients,
}

impl Default for CrossPolynomialParams {
    /// Red and blue forced to zero, green passed through
    fn default() -> Self {
        let mut green = [0.0; 10];
        green[1] = 1.0;
        Self {
            red: [0.0; 10],
            green,
            blue: [0.0; 10],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticParams {
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FalseColorParams {
    pub color0: [f32; 3],
    pub color1: [f32; 3],
}

impl Default for FalseColorParams {
    fn default() -> Self {
        Self {
            color0: [1.0, 0.0, 0.0],
            color1: [0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibranceParams {
    pub amount: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlitchParams {
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonochromeParams {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Strength of the gradient lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMapParams {
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosterizeParams {
    pub levels: f32,
}

/// Canned photo looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoEffect {
    Chrome,
    Fade,
    Instant,
    Mono,
    Noir,
    Process,
    Tonal,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SepiaParams {
    pub intensity: f32,
}

/// Whole-frame vignette; `radius` is relative to the half diagonal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VignetteParams {
    pub intensity: f32,
    pub radius: f32,
}

/// Vignette with an explicit pixel radius and soft edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VignetteEffectParams {
    /// `None` centers on the frame
    pub center: Option<Point>,
    pub radius: f32,
    pub intensity: f32,
    pub falloff: f32,
}

/// Bump and pinch share the same shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialDistortionParams {
    pub center: Point,
    pub radius: f32,
    pub scale: f32,
}

/// Bump along a line through `center` at `angle` (radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearBumpParams {
    pub center: Point,
    pub radius: f32,
    pub angle: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSplashParams {
    /// Resolved per frame from the detected region when `None`
    pub center: Option<Point>,
    pub radius: f32,
}

/// Twirl and vortex share the same shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwirlParams {
    /// Resolved per frame from the detected region when `None`
    pub center: Option<Point>,
    pub radius: f32,
    pub angle: f32,
}

/// Frame wrapped around a circle; `angle` rotates the seam
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularWrapParams {
    pub center: Point,
    pub radius: f32,
    pub angle: f32,
}

/// Capsule-shaped lens between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassLozengeParams {
    pub point0: Point,
    pub point1: Point,
    pub radius: f32,
    pub refraction: f32,
}

/// Horizontal crop and center stretch, both fractions in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchCropParams {
    pub crop_amount: f32,
    pub center_stretch: f32,
}

/// Ring-shaped lens of `width` around `radius`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusLensParams {
    pub center: Point,
    pub radius: f32,
    pub width: f32,
    pub refraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementParams {
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassParams {
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixellateParams {
    pub center: Point,
    pub scale: f32,
}

/// Triangle kaleidoscope tiles of `width` pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleTileParams {
    pub center: Point,
    pub angle: f32,
    pub width: f32,
}

/// Quad the frame rectangle is mapped onto, in absolute pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveParams {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl PerspectiveParams {
    /// Corners clockwise from the top-left
    pub fn corners(&self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

impl Default for PerspectiveParams {
    fn default() -> Self {
        Self {
            top_left: Point::new(155.0, 153.0),
            top_right: Point::new(548.0, 140.0),
            bottom_right: Point::new(646.0, 507.0),
            bottom_left: Point::new(118.0, 484.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointillizeParams {
    pub center: Point,
    pub radius: f32,
}

/// Blur along a line; `radius` in pixels, `angle` in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionBlurParams {
    pub radius: f32,
    pub angle: f32,
}

/// Spacing and line width are fractions of the frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshatchParams {
    pub spacing: f32,
    pub line_width: f32,
}

/// Block sizes and center are in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPixellateParams {
    pub radial_block: f32,
    pub angular_block: f32,
    pub center: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorControlsParams {
    pub saturation: f32,
    pub brightness: f32,
    pub contrast: f32,
}

/// Fixed grade of the camera preview, mixed in by `intensity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGradeParams {
    pub intensity: f32,
}

/// 4x4 color matrix; each row is dotted with `(r, g, b, a)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrixParams {
    pub red: [f32; 4],
    pub green: [f32; 4],
    pub blue: [f32; 4],
    pub alpha: [f32; 4],
    pub intensity: f32,
}

impl Default for ColorMatrixParams {
    /// Green leaks into every channel
    fn default() -> Self {
        Self {
            red: [1.0, 1.0, 0.0, 0.0],
            green: [0.0, 1.0, 0.0, 0.0],
            blue: [0.0, 1.0, 1.0, 0.0],
            alpha: [0.0, 1.0, 0.0, 1.0],
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCubeParams {
    pub intensity: f32,
}

/// Closed set of filter kinds, each with its own parameters
///
/// The engine and kernel library match on this exhaustively, so adding a
/// variant fails to compile until both its pre-processing and its kernel
/// exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    CrossPolynomial(CrossPolynomialParams),
    TvStatic(StaticParams),
    FalseColorCustom(FalseColorParams),
    VibranceCustom(VibranceParams),
    Glitch(GlitchParams),
    ColorInvert,
    ColorMap(ColorMapParams),
    ColorMonochrome(MonochromeParams),
    ColorPosterize(PosterizeParams),
    FalseColor(FalseColorParams),
    MaskToAlpha,
    Photo(PhotoEffect),
    SepiaTone(SepiaParams),
    Vignette(VignetteParams),
    VignetteEffect(VignetteEffectParams),
    Vibrance(VibranceParams),
    BumpDistortion(RadialDistortionParams),
    BumpDistortionLinear(LinearBumpParams),
    CircleSplash(CircleSplashParams),
    CircularWrap(CircularWrapParams),
    GlassLozenge(GlassLozengeParams),
    PinchDistortion(RadialDistortionParams),
    StretchCrop(StretchCropParams),
    TorusLens(TorusLensParams),
    Twirl(SwirlParams),
    Vortex(SwirlParams),
    Displacement(DisplacementParams),
    Glass(GlassParams),
    TriangleTile(TriangleTileParams),
    PerspectiveTile(PerspectiveParams),
    Pointillize(PointillizeParams),
    Pixellate(PixellateParams),
    MotionBlur(MotionBlurParams),
    PerspectiveTransform(PerspectiveParams),
    Crosshatch(CrosshatchParams),
    PolarPixellate(PolarPixellateParams),
    ColorControls(ColorControlsParams),
    CameraGrade(CameraGradeParams),
    ColorMatrix(ColorMatrixParams),
    ColorCube(ColorCubeParams),
}

impl FilterKind {
    /// Mutable access to a scalar parameter by its descriptor key
    fn param_mut(&mut self, key: &str) -> Option<&mut f32> {
        use FilterKind::*;

        match (self, key) {
            (TvStatic(p), "opacity") => Some(&mut p.opacity),
            (VibranceCustom(p), "vibrance") => Some(&mut p.amount),
            (Glitch(p), "opacity") => Some(&mut p.opacity),
            (ColorMap(p), "intensity") => Some(&mut p.intensity),
            (ColorMonochrome(p), "intensity") => Some(&mut p.intensity),
            (ColorPosterize(p), "levels") => Some(&mut p.levels),
            (SepiaTone(p), "intensity") => Some(&mut p.intensity),
            (Vignette(p), "intensity") => Some(&mut p.intensity),
            (Vignette(p), "radius") => Some(&mut p.radius),
            (VignetteEffect(p), "intensity") => Some(&mut p.intensity),
            (VignetteEffect(p), "radius") => Some(&mut p.radius),
            (VignetteEffect(p), "falloff") => Some(&mut p.falloff),
            (Vibrance(p), "amount") => Some(&mut p.amount),
            (BumpDistortion(p) | PinchDistortion(p), "scale") => Some(&mut p.scale),
            (BumpDistortion(p) | PinchDistortion(p), "radius") => Some(&mut p.radius),
            (BumpDistortionLinear(p), "scale") => Some(&mut p.scale),
            (BumpDistortionLinear(p), "radius") => Some(&mut p.radius),
            (BumpDistortionLinear(p), "angle") => Some(&mut p.angle),
            (CircleSplash(p), "radius") => Some(&mut p.radius),
            (CircularWrap(p), "radius") => Some(&mut p.radius),
            (CircularWrap(p), "angle") => Some(&mut p.angle),
            (GlassLozenge(p), "radius") => Some(&mut p.radius),
            (GlassLozenge(p), "refraction") => Some(&mut p.refraction),
            (StretchCrop(p), "crop_amount") => Some(&mut p.crop_amount),
            (StretchCrop(p), "center_stretch") => Some(&mut p.center_stretch),
            (TorusLens(p), "radius") => Some(&mut p.radius),
            (TorusLens(p), "width") => Some(&mut p.width),
            (TorusLens(p), "refraction") => Some(&mut p.refraction),
            (Twirl(p) | Vortex(p), "angle") => Some(&mut p.angle),
            (Twirl(p) | Vortex(p), "radius") => Some(&mut p.radius),
            (Displacement(p), "scale") => Some(&mut p.scale),
            (Glass(p), "scale") => Some(&mut p.scale),
            (TriangleTile(p), "width") => Some(&mut p.width),
            (TriangleTile(p), "angle") => Some(&mut p.angle),
            (Pointillize(p), "radius") => Some(&mut p.radius),
            (Pixellate(p), "scale") => Some(&mut p.scale),
            (MotionBlur(p), "radius") => Some(&mut p.radius),
            (MotionBlur(p), "angle") => Some(&mut p.angle),
            (Crosshatch(p), "spacing") => Some(&mut p.spacing),
            (Crosshatch(p), "line_width") => Some(&mut p.line_width),
            (PolarPixellate(p), "radial_block") => Some(&mut p.radial_block),
            (PolarPixellate(p), "angular_block") => Some(&mut p.angular_block),
            (ColorControls(p), "saturation") => Some(&mut p.saturation),
            (ColorControls(p), "brightness") => Some(&mut p.brightness),
            (ColorControls(p), "contrast") => Some(&mut p.contrast),
            (CameraGrade(p), "intensity") => Some(&mut p.intensity),
            (ColorMatrix(p), "intensity") => Some(&mut p.intensity),
            (ColorCube(p), "intensity") => Some(&mut p.intensity),
            _ => None,
        }
    }

    /// Current value of a scalar parameter
    pub fn param(&self, key: &str) -> Option<f32> {
        let mut copy = *self;
        copy.param_mut(key).map(|value| *value)
    }

    /// Set a scalar parameter; returns `false` if this kind has no such key
    pub fn set_param(&mut self, key: &str, value: f32) -> bool {
        match self.param_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
