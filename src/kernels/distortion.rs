//! Geometric distortions
//!
//! Every distortion is an inverse warp: for each output pixel center we
//! compute where in the source to read, then sample bilinearly with edge
//! clamping. The output always covers the input extent.

use std::f32::consts::TAU;

use crate::filters::kind::{
    CircleSplashParams, CircularWrapParams, GlassLozengeParams, LinearBumpParams, RadialDistortionParams,
    StretchCropParams, SwirlParams, TorusLensParams,
};
use crate::frame::{Frame, Point, TRANSPARENT};

fn warp<F>(frame: &Frame, source_of: F) -> Frame
where
    F: Fn(Point) -> Point + Sync,
{
    Frame::render(frame.extent(), |x, y| {
        let at = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        frame.sample(source_of(at))
    })
}

/// Like `warp`, but `None` or a source outside the frame gives transparency
fn warp_or_clear<F>(frame: &Frame, source_of: F) -> Frame
where
    F: Fn(Point) -> Option<Point> + Sync,
{
    Frame::render(frame.extent(), |x, y| {
        let at = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        match source_of(at) {
            Some(source) => frame.sample_inside(source),
            None => TRANSPARENT,
        }
    })
}

/// How far a lens of `refraction` pulls a point at relative height `h`
///
/// `h` is 1 on the lens axis and 0 at its rim, where nothing moves.
fn lens_factor(h: f32, refraction: f32) -> f32 {
    1.0 - (1.0 - 1.0 / refraction.max(0.01)) * h
}

fn polar(at: Point, center: Point) -> (f32, f32, f32) {
    let dx = at.x - center.x;
    let dy = at.y - center.y;
    (dx, dy, (dx * dx + dy * dy).sqrt())
}

fn radial(frame: &Frame, params: &RadialDistortionParams, sign: f32) -> Frame {
    let RadialDistortionParams { center, radius, scale } = *params;
    warp(frame, move |at| {
        let (dx, dy, d) = polar(at, center);
        if radius <= 0.0 || d >= radius {
            return at;
        }
        let t = 1.0 - d / radius;
        let factor = 1.0 + sign * scale * t * t;
        Point::new(center.x + dx * factor, center.y + dy * factor)
    })
}

/// Bulge outward (positive scale) or inward (negative scale) within `radius`
pub fn bump(frame: &Frame, params: &RadialDistortionParams) -> Frame {
    radial(frame, params, -1.0)
}

/// Pull the content towards the center within `radius`
pub fn pinch(frame: &Frame, params: &RadialDistortionParams) -> Frame {
    radial(frame, params, 1.0)
}

/// Bump across a line through the center instead of around a point
pub fn bump_linear(frame: &Frame, params: &LinearBumpParams) -> Frame {
    let LinearBumpParams {
        center,
        radius,
        angle,
        scale,
    } = *params;
    let (sin, cos) = angle.sin_cos();
    warp(frame, move |at| {
        let dx = at.x - center.x;
        let dy = at.y - center.y;
        let along = dx * cos + dy * sin;
        let across = -dx * sin + dy * cos;
        if radius <= 0.0 || across.abs() >= radius {
            return at;
        }
        let t = 1.0 - across.abs() / radius;
        let across = across * (1.0 - scale * t * t);
        Point::new(
            center.x + along * cos - across * sin,
            center.y + along * sin + across * cos,
        )
    })
}

/// Keep the disc untouched and smear its rim outward
pub fn circle_splash(frame: &Frame, params: &CircleSplashParams, center: Point) -> Frame {
    let radius = params.radius;
    warp(frame, move |at| {
        let (dx, dy, d) = polar(at, center);
        if d <= radius.max(0.0) {
            return at;
        }
        let k = radius / d;
        Point::new(center.x + dx * k, center.y + dy * k)
    })
}

/// Wrap the frame around a transparent disc of `radius`
///
/// The frame's columns run around the circle (one pixel of arc per column,
/// starting at `angle`) and its rows run outward from the rim.
pub fn circular_wrap(frame: &Frame, params: &CircularWrapParams) -> Frame {
    let CircularWrapParams { center, radius, angle } = *params;
    let (ox, oy) = frame.origin();
    warp_or_clear(frame, move |at| {
        let (dx, dy, d) = polar(at, center);
        if d < radius {
            return None;
        }
        let theta = (dy.atan2(dx) - angle).rem_euclid(TAU);
        Some(Point::new(
            ox as f32 + theta * radius.max(0.0),
            oy as f32 + (d - radius.max(0.0)),
        ))
    })
}

/// Capsule lens around the segment `point0`-`point1`
pub fn glass_lozenge(frame: &Frame, params: &GlassLozengeParams) -> Frame {
    let GlassLozengeParams {
        point0,
        point1,
        radius,
        refraction,
    } = *params;
    let (sx, sy) = (point1.x - point0.x, point1.y - point0.y);
    let length_sq = sx * sx + sy * sy;
    warp(frame, move |at| {
        let t = if length_sq > 0.0 {
            (((at.x - point0.x) * sx + (at.y - point0.y) * sy) / length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let nearest = Point::new(point0.x + sx * t, point0.y + sy * t);
        let (dx, dy, d) = polar(at, nearest);
        if radius <= 0.0 || d >= radius {
            return at;
        }
        let h = (1.0 - (d / radius).powi(2)).sqrt();
        let k = lens_factor(h, refraction);
        Point::new(nearest.x + dx * k, nearest.y + dy * k)
    })
}

/// Crop the sides and stretch the middle horizontally
///
/// `crop_amount` of the width is dropped from the edges; `center_stretch`
/// magnifies the middle at the expense of the sides.
pub fn stretch_crop(frame: &Frame, params: &StretchCropParams) -> Frame {
    let crop = params.crop_amount.clamp(0.0, 1.0);
    let stretch = params.center_stretch.clamp(0.0, 1.0);
    let extent = frame.extent();
    let half = extent.width as f32 * 0.5;
    let cx = extent.x as f32 + half;
    warp(frame, move |at| {
        if half <= 0.0 {
            return at;
        }
        let v = (at.x - cx) / half;
        let stretched = (1.0 - stretch) * v + stretch * v * v.abs();
        Point::new(cx + stretched * (1.0 - crop) * half, at.y)
    })
}

/// Ring lens of `width` centered on a circle of `radius`
pub fn torus_lens(frame: &Frame, params: &TorusLensParams) -> Frame {
    let TorusLensParams {
        center,
        radius,
        width,
        refraction,
    } = *params;
    let half = width * 0.5;
    warp(frame, move |at| {
        let (dx, dy, d) = polar(at, center);
        let offset = d - radius;
        if half <= 0.0 || offset.abs() >= half || d <= f32::EPSILON {
            return at;
        }
        let h = (1.0 - (offset / half).powi(2)).sqrt();
        let k = (radius + offset * lens_factor(h, refraction)) / d;
        Point::new(center.x + dx * k, center.y + dy * k)
    })
}

fn rotate(center: Point, dx: f32, dy: f32, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Rotation that eases out towards the rim
pub fn twirl(frame: &Frame, params: &SwirlParams, center: Point) -> Frame {
    let SwirlParams { radius, angle, .. } = *params;
    warp(frame, move |at| {
        let (dx, dy, d) = polar(at, center);
        if radius <= 0.0 || d >= radius {
            return at;
        }
        let t = 1.0 - d / radius;
        let eased = t * t * (3.0 - 2.0 * t);
        rotate(center, dx, dy, angle * eased)
    })
}

/// Rotation that falls off linearly with distance
pub fn vortex(frame: &Frame, params: &SwirlParams, center: Point) -> Frame {
    let SwirlParams { radius, angle, .. } = *params;
    warp(frame, move |at| {
        let (dx, dy, d) = polar(at, center);
        if radius <= 0.0 || d >= radius {
            return at;
        }
        rotate(center, dx, dy, angle * (1.0 - d / radius))
    })
}

/// Offset each pixel by the map's red/green channels around mid gray
pub fn displacement(frame: &Frame, map: &Frame, scale: f32) -> Frame {
    warp(frame, |at| {
        let m = map.sample(at);
        Point::new(at.x + (m[0] - 0.5) * scale, at.y + (m[1] - 0.5) * scale)
    })
}

/// Refraction through a bumpy texture
///
/// Pixels outside the texture are not displaced.
pub fn glass(frame: &Frame, texture: &Frame, scale: f32) -> Frame {
    let strength = scale * 0.05;
    let coverage = texture.extent();
    warp(frame, |at| {
        if !coverage.contains(at.x.floor() as i32, at.y.floor() as i32) {
            return at;
        }
        let t = texture.sample(at);
        Point::new(at.x + (t[0] - 0.5) * strength, at.y + (t[1] - 0.5) * strength)
    })
}
