//! Directional blur

use crate::filters::kind::MotionBlurParams;
use crate::frame::{Frame, Point};

/// Most taps a single output pixel averages
const MAX_TAPS: usize = 201;

/// Average along a line of `2 * radius` pixels through each pixel
///
/// Taps are weighted by alpha so transparent neighbours do not darken the
/// result.
pub fn motion_blur(frame: &Frame, params: &MotionBlurParams) -> Frame {
    let MotionBlurParams { radius, angle } = *params;
    if radius.is_nan() || radius < 0.5 {
        return frame.clone();
    }
    let taps = ((2.0 * radius).ceil() as usize + 1).min(MAX_TAPS);
    let (sin, cos) = angle.sin_cos();
    let step = 2.0 * radius / (taps - 1) as f32;

    Frame::render(frame.extent(), |x, y| {
        let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
        let mut sum = [0.0f32; 4];
        for k in 0..taps {
            let t = -radius + k as f32 * step;
            let p = frame.sample(Point::new(cx + t * cos, cy + t * sin));
            sum[0] += p[0] * p[3];
            sum[1] += p[1] * p[3];
            sum[2] += p[2] * p[3];
            sum[3] += p[3];
        }
        if sum[3] <= 0.0 {
            return [0.0, 0.0, 0.0, 0.0];
        }
        [
            sum[0] / sum[3],
            sum[1] / sum[3],
            sum[2] / sum[3],
            sum[3] / taps as f32,
        ]
    })
}
