//! Photo looks, the camera grade, sepia and vignettes

use crate::filters::kind::{ColorControlsParams, PhotoEffect, VignetteEffectParams, VignetteParams};
use crate::frame::{Frame, Point, Rgba};

use super::color::{color_controls_pixel, highlight_pixel, hue_adjust_pixel, luminance, mix, vibrance_pixel};

/// Tone curve shared by the photo looks
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grade {
    saturation: f32,
    contrast: f32,
    /// Per-channel multiplier applied after contrast
    gain: [f32; 3],
    /// Raised black point
    lift: f32,
}

impl Grade {
    const fn new(saturation: f32, contrast: f32, gain: [f32; 3], lift: f32) -> Self {
        Self {
            saturation,
            contrast,
            gain,
            lift,
        }
    }

    fn for_effect(effect: PhotoEffect) -> Self {
        match effect {
            PhotoEffect::Chrome => Grade::new(1.25, 1.15, [1.02, 1.0, 0.98], 0.0),
            PhotoEffect::Fade => Grade::new(0.75, 0.85, [1.0, 1.0, 1.0], 0.08),
            PhotoEffect::Instant => Grade::new(0.9, 0.95, [1.06, 1.0, 0.9], 0.04),
            PhotoEffect::Mono => Grade::new(0.0, 1.0, [1.0, 1.0, 1.0], 0.0),
            PhotoEffect::Noir => Grade::new(0.0, 1.4, [1.0, 1.0, 1.0], 0.0),
            PhotoEffect::Process => Grade::new(0.95, 1.1, [0.92, 1.0, 1.08], 0.02),
            PhotoEffect::Tonal => Grade::new(0.0, 0.9, [1.0, 1.0, 1.0], 0.03),
            PhotoEffect::Transfer => Grade::new(1.1, 0.95, [1.05, 0.98, 0.88], 0.05),
        }
    }

    fn apply(&self, p: [f32; 4]) -> [f32; 4] {
        let lum = luminance(&p);
        let mut out = [0.0; 4];
        for c in 0..3 {
            let saturated = mix(lum, p[c], self.saturation);
            let contrasted = (saturated - 0.5) * self.contrast + 0.5;
            let graded = contrasted * self.gain[c];
            out[c] = (self.lift + graded * (1.0 - self.lift)).clamp(0.0, 1.0);
        }
        out[3] = p[3];
        out
    }
}

pub fn photo_effect(frame: &Frame, effect: PhotoEffect) -> Frame {
    let grade = Grade::for_effect(effect);
    frame.map_pixels(move |_, _, p| grade.apply(p))
}

const GRADE_CONTRAST: ColorControlsParams = ColorControlsParams {
    saturation: 1.0,
    brightness: 0.0,
    contrast: 2.9,
};
const GRADE_HIGHLIGHTS: f32 = 0.3;
const GRADE_HUE: f32 = 1.665;
const GRADE_VIBRANCE: f32 = 0.8;
const GRADE_SATURATION: ColorControlsParams = ColorControlsParams {
    saturation: 0.96,
    brightness: 0.0,
    contrast: 1.0,
};

fn camera_grade_pixel(p: Rgba) -> Rgba {
    let p = color_controls_pixel(p, &GRADE_CONTRAST);
    let p = highlight_pixel(p, GRADE_HIGHLIGHTS);
    let p = hue_adjust_pixel(p, GRADE_HUE);
    let p = vibrance_pixel(p, GRADE_VIBRANCE);
    color_controls_pixel(p, &GRADE_SATURATION)
}

/// Preview grade: hard contrast, softened highlights, hue shift, vibrance
/// and a touch of desaturation, mixed with the source by `intensity`
pub fn camera_grade(frame: &Frame, intensity: f32) -> Frame {
    frame.map_pixels(move |_, _, p| {
        let graded = camera_grade_pixel(p);
        [
            mix(p[0], graded[0], intensity),
            mix(p[1], graded[1], intensity),
            mix(p[2], graded[2], intensity),
            p[3],
        ]
    })
}

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Sepia matrix blended with the source by `intensity`
pub fn sepia(frame: &Frame, intensity: f32) -> Frame {
    frame.map_pixels(move |_, _, p| {
        let mut out = [0.0, 0.0, 0.0, p[3]];
        for (c, row) in SEPIA.iter().enumerate() {
            let toned = (row[0] * p[0] + row[1] * p[1] + row[2] * p[2]).min(1.0);
            out[c] = mix(p[c], toned, intensity);
        }
        out
    })
}

/// Darken towards the corners
///
/// Distance is measured from the frame center and normalized by the half
/// diagonal, so `radius = 1` reaches exactly into the corners.
pub fn vignette(frame: &Frame, params: &VignetteParams) -> Frame {
    let VignetteParams { intensity, radius } = *params;
    let w = frame.width() as f32;
    let h = frame.height() as f32;
    let (cx, cy) = (w * 0.5, h * 0.5);
    let half_diagonal = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);

    frame.map_pixels(move |x, y, p| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let d = (dx * dx + dy * dy).sqrt() / half_diagonal;
        let t = if radius <= 0.0 { 1.0 } else { (d / radius).min(1.0) };
        let factor = (1.0 - intensity * t * t).clamp(0.0, 2.0);
        [
            (p[0] * factor).clamp(0.0, 1.0),
            (p[1] * factor).clamp(0.0, 1.0),
            (p[2] * factor).clamp(0.0, 1.0),
            p[3],
        ]
    })
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Vignette with a pixel radius and soft falloff band
pub fn vignette_effect(frame: &Frame, params: &VignetteEffectParams) -> Frame {
    let VignetteEffectParams {
        center,
        radius,
        intensity,
        falloff,
    } = *params;
    let center = center.unwrap_or_else(|| frame.extent().center());
    let (ox, oy) = frame.origin();
    let inner = radius * (1.0 - falloff.clamp(0.0, 1.0));

    frame.map_pixels(move |x, y, p| {
        let at = Point::new(ox as f32 + x as f32 + 0.5, oy as f32 + y as f32 + 0.5);
        let d = ((at.x - center.x).powi(2) + (at.y - center.y).powi(2)).sqrt();
        let darkness = smoothstep(inner, radius, d) * intensity;
        let factor = (1.0 - darkness).clamp(0.0, 1.0);
        [p[0] * factor, p[1] * factor, p[2] * factor, p[3]]
    })
}
