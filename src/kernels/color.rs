//! Point color kernels: every output pixel depends only on the input pixel
//! at the same position. Alpha is always preserved unless stated otherwise.

use crate::filters::kind::{
    ColorControlsParams, ColorMatrixParams, CrossPolynomialParams, FalseColorParams, MonochromeParams,
};
use crate::frame::{Frame, Point, Rgba};

/// Rec. 709 luma weights
pub const REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

pub fn luminance(p: &Rgba) -> f32 {
    p[0] * REC709[0] + p[1] * REC709[1] + p[2] * REC709[2]
}

pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn polynomial(coefficients: &[f32; 10], terms: &[f32; 10]) -> f32 {
    coefficients
        .iter()
        .zip(terms)
        .fold(0.0, |acc, (c, t)| acc + c * t)
}

/// Per-channel polynomial over r, g, b, their squares, cross terms and 1
pub fn cross_polynomial(frame: &Frame, params: &CrossPolynomialParams) -> Frame {
    let params = *params;
    frame.map_pixels(move |_, _, p| {
        let (r, g, b) = (p[0], p[1], p[2]);
        let terms = [r, g, b, r * r, g * g, b * b, r * g, g * b, b * r, 1.0];
        [
            polynomial(&params.red, &terms),
            polynomial(&params.green, &terms),
            polynomial(&params.blue, &terms),
            p[3],
        ]
    })
}

/// Vibrance as the custom kernel computes it
///
/// `amt = (max - avg) * (-vibrance * 3)` and the color is pulled towards
/// `max` by `amt`. With positive `vibrance` this moves colors towards their
/// maximum component, i.e. towards gray for saturated pixels.
pub fn vibrance_custom(frame: &Frame, vibrance: f32) -> Frame {
    frame.map_pixels(move |_, _, p| {
        let average = (p[0] + p[1] + p[2]) / 3.0;
        let mx = p[0].max(p[1]).max(p[2]);
        let amt = (mx - average) * (-vibrance * 3.0);
        [mix(p[0], mx, amt), mix(p[1], mx, amt), mix(p[2], mx, amt), p[3]]
    })
}

/// Map luminance onto the gradient `color0 -> color1`
pub fn false_color(frame: &Frame, params: &FalseColorParams) -> Frame {
    let FalseColorParams { color0, color1 } = *params;
    frame.map_pixels(move |_, _, p| {
        let lum = luminance(&p);
        [
            mix(color0[0], color1[0], lum),
            mix(color0[1], color1[1], lum),
            mix(color0[2], color1[2], lum),
            p[3],
        ]
    })
}

pub fn invert(frame: &Frame) -> Frame {
    frame.map_pixels(|_, _, p| [1.0 - p[0], 1.0 - p[1], 1.0 - p[2], p[3]])
}

/// Look the luminance up in a horizontal gradient strip
///
/// Black reads the strip's left edge and white its right edge. The result
/// is mixed with the source by `intensity`.
pub fn color_map(frame: &Frame, gradient: &Frame, intensity: f32) -> Frame {
    let strip = gradient.extent();
    let row = strip.y as f32 + strip.height as f32 * 0.5;
    frame.map_pixels(move |_, _, p| {
        let lum = luminance(&p).clamp(0.0, 1.0);
        let q = gradient.sample(Point::new(strip.x as f32 + lum * strip.width as f32, row));
        [
            mix(p[0], q[0], intensity),
            mix(p[1], q[1], intensity),
            mix(p[2], q[2], intensity),
            p[3],
        ]
    })
}

/// Overlay blend of a gray level onto a tint channel
///
/// Mid gray maps to the tint itself, black to black and white to white.
fn overlay_tint(lum: f32, tint: f32) -> f32 {
    if lum < 0.5 {
        2.0 * lum * tint
    } else {
        1.0 - 2.0 * (1.0 - lum) * (1.0 - tint)
    }
}

/// Tint by luminance, blended with the source by `intensity`
pub fn monochrome(frame: &Frame, params: &MonochromeParams) -> Frame {
    let MonochromeParams { color, intensity } = *params;
    frame.map_pixels(move |_, _, p| {
        let lum = luminance(&p).clamp(0.0, 1.0);
        [
            mix(p[0], overlay_tint(lum, color[0]), intensity),
            mix(p[1], overlay_tint(lum, color[1]), intensity),
            mix(p[2], overlay_tint(lum, color[2]), intensity),
            p[3],
        ]
    })
}

/// Quantize each channel to `levels` evenly spaced values
pub fn posterize(frame: &Frame, levels: f32) -> Frame {
    let steps = (levels.round().max(2.0)) - 1.0;
    frame.map_pixels(move |_, _, p| {
        let q = |c: f32| (c.clamp(0.0, 1.0) * steps).round() / steps;
        [q(p[0]), q(p[1]), q(p[2]), p[3]]
    })
}

/// White image whose alpha is the source luminance
pub fn mask_to_alpha(frame: &Frame) -> Frame {
    frame.map_pixels(|_, _, p| [1.0, 1.0, 1.0, luminance(&p).clamp(0.0, 1.0)])
}

pub fn vibrance_pixel(p: Rgba, amount: f32) -> Rgba {
    let mx = p[0].max(p[1]).max(p[2]);
    let mn = p[0].min(p[1]).min(p[2]);
    let saturation = mx - mn;
    let lum = luminance(&p);
    let factor = 1.0 + amount * (1.0 - saturation);
    let adjust = |c: f32| (lum + (c - lum) * factor).clamp(0.0, 1.0);
    [adjust(p[0]), adjust(p[1]), adjust(p[2]), p[3]]
}

/// Saturation-aware vibrance: muted colors are boosted more than vivid ones
pub fn vibrance(frame: &Frame, amount: f32) -> Frame {
    frame.map_pixels(move |_, _, p| vibrance_pixel(p, amount))
}

pub fn color_controls_pixel(p: Rgba, params: &ColorControlsParams) -> Rgba {
    let ColorControlsParams {
        saturation,
        brightness,
        contrast,
    } = *params;
    let lum = luminance(&p);
    let adjust = |c: f32| {
        let saturated = lum + (c - lum) * saturation;
        (((saturated + brightness) - 0.5) * contrast + 0.5).clamp(0.0, 1.0)
    };
    [adjust(p[0]), adjust(p[1]), adjust(p[2]), p[3]]
}

/// Saturation, then brightness, then contrast around mid gray
pub fn color_controls(frame: &Frame, params: &ColorControlsParams) -> Frame {
    let params = *params;
    frame.map_pixels(move |_, _, p| color_controls_pixel(p, &params))
}

/// Rotate the hue by `angle` radians around the gray axis
pub fn hue_adjust_pixel(p: Rgba, angle: f32) -> Rgba {
    let (sin, cos) = angle.sin_cos();
    let third = (1.0 - cos) / 3.0;
    let s = sin / 3.0_f32.sqrt();
    let diagonal = cos + third;
    [
        p[0] * diagonal + p[1] * (third - s) + p[2] * (third + s),
        p[0] * (third + s) + p[1] * diagonal + p[2] * (third - s),
        p[0] * (third - s) + p[1] * (third + s) + p[2] * diagonal,
        p[3],
    ]
}

/// Pull highlights down; `amount` of 1 leaves the pixel alone
///
/// Only luminance above mid gray is affected, ramping in smoothly.
pub fn highlight_pixel(p: Rgba, amount: f32) -> Rgba {
    let lum = luminance(&p);
    if lum <= 0.5 {
        return p;
    }
    let t = ((lum - 0.5) / 0.5).min(1.0);
    let weight = t * t * (3.0 - 2.0 * t);
    let target = lum - weight * (1.0 - amount) * (lum - 0.5);
    let k = target / lum;
    [p[0] * k, p[1] * k, p[2] * k, p[3]]
}

/// Multiply by a 4x4 color matrix, mixed with the source by `intensity`
pub fn color_matrix(frame: &Frame, params: &ColorMatrixParams) -> Frame {
    let ColorMatrixParams {
        red,
        green,
        blue,
        alpha,
        intensity,
    } = *params;
    frame.map_pixels(move |_, _, p| {
        let row = |v: [f32; 4]| (p[0] * v[0] + p[1] * v[1] + p[2] * v[2] + p[3] * v[3]).clamp(0.0, 1.0);
        let q = [row(red), row(green), row(blue), row(alpha)];
        [
            mix(p[0], q[0], intensity),
            mix(p[1], q[1], intensity),
            mix(p[2], q[2], intensity),
            mix(p[3], q[3], intensity),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba as Px};

    fn gradient(width: u32, height: u32) -> Frame {
        Frame::new(ImageBuffer::from_fn(width, height, |x, y| {
            Px([
                x as f32 / width as f32,
                y as f32 / height as f32,
                ((x + y) % 7) as f32 / 6.0,
                0.25 + (x % 3) as f32 * 0.25,
            ])
        }))
    }

    #[test]
    fn test_cross_polynomial_keeps_green_exactly() {
        let input = gradient(17, 9);
        let output = cross_polynomial(&input, &CrossPolynomialParams::default());

        for y in 0..input.height() {
            for x in 0..input.width() {
                let p = input.pixel(x, y);
                assert_eq!(output.pixel(x, y), [0.0, p[1], 0.0, p[3]]);
            }
        }
    }

    #[test]
    fn test_false_color_endpoints() {
        let params = FalseColorParams::default();

        let black = false_color(&Frame::new_filled(3, 3, [0.0, 0.0, 0.0, 1.0]), &params).pixel(1, 1);
        assert_eq!(black, [1.0, 0.0, 0.0, 1.0]);

        let white = false_color(&Frame::new_filled(3, 3, [1.0, 1.0, 1.0, 0.5]), &params).pixel(1, 1);
        assert!(white[0].abs() < 1e-6);
        assert!(white[1].abs() < 1e-6);
        assert!((white[2] - 1.0).abs() < 1e-6);
        assert_eq!(white[3], 0.5);
    }

    #[test]
    fn test_vibrance_custom_gray_unchanged() {
        let gray = Frame::new_filled(4, 4, [0.4, 0.4, 0.4, 1.0]);
        let out = vibrance_custom(&gray, 1.0);
        let p = out.pixel(0, 0);
        assert!((p[0] - 0.4).abs() < 1e-6);
        assert!((p[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_vibrance_custom_matches_formula() {
        let frame = Frame::new_filled(1, 1, [0.6, 0.3, 0.0, 0.9]);
        let p = vibrance_custom(&frame, 0.5).pixel(0, 0);

        let avg = 0.3_f32;
        let mx = 0.6_f32;
        let amt = (mx - avg) * (-0.5 * 3.0);
        assert!((p[0] - 0.6).abs() < 1e-6);
        assert!((p[1] - (0.3 + (mx - 0.3) * amt)).abs() < 1e-6);
        assert!((p[2] - (0.0 + mx * amt)).abs() < 1e-6);
        assert_eq!(p[3], 0.9);
    }

    #[test]
    fn test_invert_preserves_alpha() {
        let p = invert(&Frame::new_filled(2, 2, [0.25, 0.5, 1.0, 0.3])).pixel(1, 0);
        assert_eq!(p, [0.75, 0.5, 0.0, 0.3]);
    }

    #[test]
    fn test_monochrome_mid_gray_takes_tint() {
        let params = MonochromeParams {
            color: [0.7, 0.4, 0.1],
            intensity: 1.0,
        };
        let p = monochrome(&Frame::new_filled(2, 2, [0.5, 0.5, 0.5, 0.8]), &params).pixel(1, 1);
        assert!((p[0] - 0.7).abs() < 1e-5);
        assert!((p[1] - 0.4).abs() < 1e-5);
        assert!((p[2] - 0.1).abs() < 1e-5);
        assert_eq!(p[3], 0.8);
    }

    #[test]
    fn test_monochrome_keeps_black_and_white() {
        let params = MonochromeParams {
            color: [0.7, 0.7, 0.7],
            intensity: 1.0,
        };
        let black = monochrome(&Frame::new_filled(1, 1, [0.0, 0.0, 0.0, 1.0]), &params).pixel(0, 0);
        let white = monochrome(&Frame::new_filled(1, 1, [1.0, 1.0, 1.0, 1.0]), &params).pixel(0, 0);
        assert!(black[..3].iter().all(|c| c.abs() < 1e-5));
        assert!(white[..3].iter().all(|c| (c - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_monochrome_zero_intensity_is_identity() {
        let params = MonochromeParams {
            color: [0.7, 0.7, 0.7],
            intensity: 0.0,
        };
        let frame = Frame::new_filled(1, 1, [0.1, 0.6, 0.3, 1.0]);
        assert_eq!(monochrome(&frame, &params).pixel(0, 0), frame.pixel(0, 0));
    }

    #[test]
    fn test_posterize_levels() {
        let frame = Frame::new_filled(1, 1, [0.33, 0.5, 0.97, 1.0]);
        let p = posterize(&frame, 6.0).pixel(0, 0);
        // Six levels: 0, 0.2, 0.4, 0.6, 0.8, 1.0
        assert!((p[0] - 0.4).abs() < 1e-6);
        assert!((p[1] - 0.6).abs() < 1e-6 || (p[1] - 0.4).abs() < 1e-6);
        assert!((p[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mask_to_alpha() {
        let p = mask_to_alpha(&Frame::new_filled(1, 1, [0.0, 0.0, 0.0, 1.0])).pixel(0, 0);
        assert_eq!(p, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_color_controls_identity() {
        let frame = Frame::new_filled(2, 2, [0.2, 0.5, 0.8, 1.0]);
        let params = ColorControlsParams {
            saturation: 1.0,
            brightness: 0.0,
            contrast: 1.0,
        };
        let p = color_controls(&frame, &params).pixel(0, 0);
        assert!((p[0] - 0.2).abs() < 1e-6);
        assert!((p[1] - 0.5).abs() < 1e-6);
        assert!((p[2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_color_map_reads_gradient_ends() {
        let gradient = Frame::new(ImageBuffer::from_fn(4, 1, |x, _| {
            let v = x as f32 / 3.0;
            Px([v, 0.0, 1.0 - v, 1.0])
        }));

        let black = color_map(&Frame::new_filled(1, 1, [0.0, 0.0, 0.0, 0.6]), &gradient, 1.0).pixel(0, 0);
        assert_eq!(black, [0.0, 0.0, 1.0, 0.6]);

        let white = color_map(&Frame::new_filled(1, 1, [1.0, 1.0, 1.0, 1.0]), &gradient, 1.0).pixel(0, 0);
        assert!((white[0] - 1.0).abs() < 1e-5);
        assert!(white[2].abs() < 1e-5);

        let frame = Frame::new_filled(1, 1, [0.3, 0.2, 0.1, 1.0]);
        assert_eq!(color_map(&frame, &gradient, 0.0).pixel(0, 0), frame.pixel(0, 0));
    }

    #[test]
    fn test_hue_adjust_keeps_gray_and_cycles() {
        let gray = [0.4, 0.4, 0.4, 1.0];
        let rotated = hue_adjust_pixel(gray, 1.665);
        for c in 0..3 {
            assert!((rotated[c] - 0.4).abs() < 1e-5);
        }

        // A third of a turn moves red to green
        let red = hue_adjust_pixel([1.0, 0.0, 0.0, 1.0], std::f32::consts::TAU / 3.0);
        assert!(red[0].abs() < 1e-5);
        assert!((red[1] - 1.0).abs() < 1e-5);
        assert!(red[2].abs() < 1e-5);
    }

    #[test]
    fn test_highlight_only_touches_bright_pixels() {
        let dark = [0.2, 0.3, 0.1, 1.0];
        assert_eq!(highlight_pixel(dark, 0.3), dark);

        let bright = highlight_pixel([0.9, 0.9, 0.9, 1.0], 0.3);
        assert!(bright[0] < 0.9);
        assert!(bright[0] > 0.5);
        assert_eq!(highlight_pixel([0.9, 0.9, 0.9, 1.0], 1.0), [0.9, 0.9, 0.9, 1.0]);
    }

    #[test]
    fn test_color_matrix_default_and_intensity() {
        let frame = Frame::new_filled(1, 1, [0.2, 0.3, 0.4, 0.5]);
        let params = ColorMatrixParams::default();

        let p = color_matrix(&frame, &params).pixel(0, 0);
        assert!((p[0] - 0.5).abs() < 1e-6);
        assert!((p[1] - 0.3).abs() < 1e-6);
        assert!((p[2] - 0.7).abs() < 1e-6);
        assert!((p[3] - 0.8).abs() < 1e-6);

        let half = color_matrix(&frame, &ColorMatrixParams { intensity: 0.5, ..params }).pixel(0, 0);
        assert!((half[0] - 0.35).abs() < 1e-6);
        assert!((half[3] - 0.65).abs() < 1e-6);

        let none = color_matrix(&frame, &ColorMatrixParams { intensity: 0.0, ..params }).pixel(0, 0);
        assert_eq!(none, frame.pixel(0, 0));
    }

    #[test]
    fn test_vibrance_boosts_muted_colors() {
        let muted = Frame::new_filled(1, 1, [0.5, 0.45, 0.4, 1.0]);
        let p = vibrance(&muted, 1.0).pixel(0, 0);
        // Spread between channels grows
        assert!(p[0] - p[2] > 0.1);
    }
}
