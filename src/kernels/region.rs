//! Block and line kernels that read neighbouring regions of the source

use std::f32::consts::PI;

use crate::filters::kind::{CrosshatchParams, PixellateParams, PointillizeParams, PolarPixellateParams};
use crate::frame::{Frame, Point};

use super::color::luminance;
use super::generators::lattice_unit;

/// Square blocks of `scale` pixels, aligned so a block edge passes through
/// `center`; each block takes the color at its middle
pub fn pixellate(frame: &Frame, params: &PixellateParams) -> Frame {
    let PixellateParams { center, scale } = *params;
    let size = scale.max(1.0);
    Frame::render(frame.extent(), |x, y| {
        let bx = ((x as f32 + 0.5 - center.x) / size).floor();
        let by = ((y as f32 + 0.5 - center.y) / size).floor();
        let at = Point::new(center.x + (bx + 0.5) * size, center.y + (by + 0.5) * size);
        frame.sample_nearest(at)
    })
}

/// Dot painted for one lattice cell
fn dot(center: Point, size: f32, i: i64, j: i64) -> Point {
    let jitter = |channel| 0.15 + 0.7 * lattice_unit(i, j, channel);
    Point::new(
        center.x + (i as f32 + jitter(1)) * size,
        center.y + (j as f32 + jitter(2)) * size,
    )
}

/// Cells of `2 * radius` with one jittered dot each; every pixel takes the
/// color under its nearest dot
pub fn pointillize(frame: &Frame, params: &PointillizeParams) -> Frame {
    let PointillizeParams { center, radius } = *params;
    let size = (radius * 2.0).max(1.0);
    Frame::render(frame.extent(), |x, y| {
        let at = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        let ci = ((at.x - center.x) / size).floor() as i64;
        let cj = ((at.y - center.y) / size).floor() as i64;

        let mut nearest = dot(center, size, ci, cj);
        let mut best = f32::MAX;
        for j in cj - 1..=cj + 1 {
            for i in ci - 1..=ci + 1 {
                let candidate = dot(center, size, i, j);
                let d = (candidate.x - at.x).powi(2) + (candidate.y - at.y).powi(2);
                if d < best {
                    best = d;
                    nearest = candidate;
                }
            }
        }
        frame.sample_nearest(nearest)
    })
}

/// Black-on-white line drawing; darker areas receive more line directions
pub fn crosshatch(frame: &Frame, params: &CrosshatchParams) -> Frame {
    let CrosshatchParams { spacing, line_width } = *params;
    let w = frame.width().max(1) as f32;
    let h = frame.height().max(1) as f32;
    let spacing = spacing.max(f32::EPSILON);
    let half = spacing * 0.5;
    let on_line = move |v: f32| v.rem_euclid(spacing) <= line_width;

    frame.map_pixels(move |x, y, p| {
        let u = (x as f32 + 0.5) / w;
        let v = (y as f32 + 0.5) / h;
        let lum = luminance(&p);

        let hatched = (lum < 1.0 && on_line(u + v))
            || (lum < 0.75 && on_line(u - v))
            || (lum < 0.5 && on_line(u + v - half))
            || (lum < 0.3 && on_line(u - v - half));

        let ink = if hatched { 0.0 } else { 1.0 };
        [ink, ink, ink, p[3]]
    })
}

/// Pixellate in polar coordinates around a normalized center
pub fn polar_pixellate(frame: &Frame, params: &PolarPixellateParams) -> Frame {
    let PolarPixellateParams {
        radial_block,
        angular_block,
        center,
    } = *params;
    let extent = frame.extent();
    let w = extent.width.max(1) as f32;
    let h = extent.height.max(1) as f32;
    let (ox, oy) = (extent.x as f32, extent.y as f32);
    let norm_center = (2.0 * center.x - 1.0, 2.0 * center.y - 1.0);
    let radial = radial_block.max(f32::EPSILON);
    let angular = angular_block.max(f32::EPSILON);

    Frame::render(extent, |x, y| {
        let u = (x as f32 - ox + 0.5) / w;
        let v = (y as f32 - oy + 0.5) / h;
        let nx = 2.0 * u - 1.0 - norm_center.0;
        let ny = 2.0 * v - 1.0 - norm_center.1;

        let r = (nx * nx + ny * ny).sqrt();
        let phi = ny.atan2(nx) + PI;
        let r = r - r.rem_euclid(radial) + radial * 0.5;
        let phi = phi - phi.rem_euclid(angular) - PI;

        let sx = r * phi.cos() + norm_center.0;
        let sy = r * phi.sin() + norm_center.1;
        let at = Point::new(ox + (sx * 0.5 + 0.5) * w, oy + (sy * 0.5 + 0.5) * h);
        frame.sample_nearest(at)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixellate_uniform_blocks() {
        let frame = Frame::render(crate::frame::Extent::from_size(32, 32), |x, y| {
            [x as f32 / 32.0, y as f32 / 32.0, 0.0, 1.0]
        });
        let params = PixellateParams {
            center: Point::new(0.0, 0.0),
            scale: 8.0,
        };
        let out = pixellate(&frame, &params);

        assert_eq!(out.pixel(0, 0), out.pixel(7, 7));
        assert_eq!(out.pixel(8, 8), out.pixel(15, 15));
        assert_ne!(out.pixel(7, 7), out.pixel(8, 8));
        assert_eq!(out.pixel(3, 3), frame.pixel(4, 4));
    }

    #[test]
    fn test_pointillize_paints_flat_dots() {
        let frame = Frame::render(crate::frame::Extent::from_size(60, 60), |x, y| {
            [x as f32 / 60.0, y as f32 / 60.0, 0.5, 1.0]
        });
        let params = PointillizeParams {
            center: Point::new(0.0, 0.0),
            radius: 10.0,
        };
        let out = pointillize(&frame, &params);
        assert_eq!(out.extent(), frame.extent());

        // Far fewer distinct colors than pixels
        let mut colors: Vec<[u32; 4]> = out
            .as_image()
            .pixels()
            .map(|p| p.0.map(f32::to_bits))
            .collect();
        colors.sort_unstable();
        colors.dedup();
        assert!(colors.len() <= 25, "{} colors", colors.len());

        let uniform = Frame::new_filled(20, 20, [0.3, 0.2, 0.1, 1.0]);
        assert_eq!(pointillize(&uniform, &params).pixel(7, 13), [0.3, 0.2, 0.1, 1.0]);
    }

    #[test]
    fn test_crosshatch_white_stays_white() {
        let frame = Frame::new_filled(50, 50, [1.0, 1.0, 1.0, 1.0]);
        let params = CrosshatchParams {
            spacing: 0.01,
            line_width: 0.003,
        };
        let out = crosshatch(&frame, &params);
        for y in 0..50 {
            for x in 0..50 {
                assert_eq!(out.pixel(x, y), [1.0, 1.0, 1.0, 1.0]);
            }
        }
    }

    #[test]
    fn test_crosshatch_dark_has_lines_and_only_ink_colors() {
        let frame = Frame::new_filled(100, 100, [0.1, 0.1, 0.1, 0.8]);
        let params = CrosshatchParams {
            spacing: 0.05,
            line_width: 0.01,
        };
        let out = crosshatch(&frame, &params);

        let mut black = 0;
        for y in 0..100 {
            for x in 0..100 {
                let p = out.pixel(x, y);
                assert!(p[0] == 0.0 || p[0] == 1.0);
                assert_eq!(p[3], 0.8);
                if p[0] == 0.0 {
                    black += 1;
                }
            }
        }
        assert!(black > 0);
        assert!(black < 100 * 100);
    }

    #[test]
    fn test_polar_pixellate_uniform_input() {
        let frame = Frame::new_filled(40, 30, [0.3, 0.6, 0.9, 1.0]);
        let params = PolarPixellateParams {
            radial_block: 0.05,
            angular_block: 0.03,
            center: Point::new(0.35, 0.55),
        };
        let out = polar_pixellate(&frame, &params);
        assert_eq!(out.extent(), frame.extent());
        assert_eq!(out.pixel(20, 15), [0.3, 0.6, 0.9, 1.0]);
    }
}
