//! Tiling and perspective kernels
//!
//! Perspective filters map the frame rectangle onto a quad through a
//! projective transform and invert it per output pixel.

use crate::filters::kind::{PerspectiveParams, TriangleTileParams};
use crate::frame::{Frame, Point, TRANSPARENT};

/// Projective transform of the plane, row-major 3x3
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography([[f64; 3]; 3]);

impl Homography {
    /// Map the unit square onto `quad`
    ///
    /// Corners go clockwise from the top-left: (0,0), (1,0), (1,1), (0,1).
    /// Returns `None` for degenerate quads.
    pub fn square_to_quad(quad: [Point; 4]) -> Option<Self> {
        let [p0, p1, p2, p3] = quad.map(|p| (p.x as f64, p.y as f64));

        let (dx1, dy1) = (p1.0 - p2.0, p1.1 - p2.1);
        let (dx2, dy2) = (p3.0 - p2.0, p3.1 - p2.1);
        let (dx3, dy3) = (p0.0 - p1.0 + p2.0 - p3.0, p0.1 - p1.1 + p2.1 - p3.1);

        let den = dx1 * dy2 - dx2 * dy1;
        if den.abs() < 1e-9 {
            return None;
        }
        let g = (dx3 * dy2 - dx2 * dy3) / den;
        let h = (dx1 * dy3 - dx3 * dy1) / den;

        Some(Self([
            [p1.0 - p0.0 + g * p1.0, p3.0 - p0.0 + h * p3.0, p0.0],
            [p1.1 - p0.1 + g * p1.1, p3.1 - p0.1 + h * p3.1, p0.1],
            [g, h, 1.0],
        ]))
    }

    pub fn inverse(&self) -> Option<Self> {
        let m = &self.0;
        let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0];

        let adj = [
            [cofactor(1, 2, 1, 2), -cofactor(0, 2, 1, 2), cofactor(0, 1, 1, 2)],
            [-cofactor(1, 2, 0, 2), cofactor(0, 2, 0, 2), -cofactor(0, 1, 0, 2)],
            [cofactor(1, 2, 0, 1), -cofactor(0, 2, 0, 1), cofactor(0, 1, 0, 1)],
        ];
        let det = m[0][0] * adj[0][0] + m[0][1] * adj[1][0] + m[0][2] * adj[2][0];
        if det.abs() < 1e-12 {
            return None;
        }

        let mut inv = [[0.0; 3]; 3];
        for (r, row) in adj.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                inv[r][c] = value / det;
            }
        }
        Some(Self(inv))
    }

    /// Transform a point; `None` where it maps to infinity
    pub fn apply(&self, p: Point) -> Option<Point> {
        let m = &self.0;
        let (x, y) = (p.x as f64, p.y as f64);
        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        if w.abs() < 1e-12 {
            return None;
        }
        Some(Point::new(
            ((m[0][0] * x + m[0][1] * y + m[0][2]) / w) as f32,
            ((m[1][0] * x + m[1][1] * y + m[1][2]) / w) as f32,
        ))
    }
}

/// Output pixel center to unit-square coordinates of the quad
fn unit_coordinates(params: &PerspectiveParams) -> Option<Homography> {
    Homography::square_to_quad(params.corners())?.inverse()
}

fn perspective<F>(frame: &Frame, params: &PerspectiveParams, wrap: F) -> Frame
where
    F: Fn(Point) -> Option<Point> + Sync,
{
    let inverse = match unit_coordinates(params) {
        Some(inverse) => inverse,
        None => return frame.clone(),
    };
    let extent = frame.extent();
    let (w, h) = (extent.width as f32, extent.height as f32);

    Frame::render(extent, |x, y| {
        let at = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        match inverse.apply(at).and_then(&wrap) {
            Some(uv) => frame.sample(Point::new(extent.x as f32 + uv.x * w, extent.y as f32 + uv.y * h)),
            None => TRANSPARENT,
        }
    })
}

/// Map the frame onto the quad; everything outside it is transparent
pub fn perspective_transform(frame: &Frame, params: &PerspectiveParams) -> Frame {
    perspective(frame, params, |uv| {
        let inside = (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y);
        inside.then_some(uv)
    })
}

/// Repeat the frame in every direction, then map the tiling onto the quad
pub fn perspective_tile(frame: &Frame, params: &PerspectiveParams) -> Frame {
    perspective(frame, params, |uv| Some(Point::new(uv.x.rem_euclid(1.0), uv.y.rem_euclid(1.0))))
}

/// Reflect into `[0, 1]` with period 2
fn fold(t: f32) -> f32 {
    let m = t.rem_euclid(2.0);
    if m > 1.0 {
        2.0 - m
    } else {
        m
    }
}

/// Kaleidoscope of mirrored right triangles
///
/// The plane is cut into squares of `width` around `center` (rotated by
/// `angle`), each square is folded onto the first, and the upper half of
/// that square is mirrored onto the lower triangle.
pub fn triangle_tile(frame: &Frame, params: &TriangleTileParams) -> Frame {
    let TriangleTileParams { center, angle, width } = *params;
    if width <= 0.0 {
        return frame.clone();
    }
    let (sin, cos) = angle.sin_cos();

    Frame::render(frame.extent(), |x, y| {
        let dx = x as f32 + 0.5 - center.x;
        let dy = y as f32 + 0.5 - center.y;
        let mut u = fold((dx * cos + dy * sin) / width);
        let mut v = fold((-dx * sin + dy * cos) / width);
        if v > u {
            std::mem::swap(&mut u, &mut v);
        }
        let (lu, lv) = (u * width, v * width);
        frame.sample(Point::new(center.x + lu * cos - lv * sin, center.y + lu * sin + lv * cos))
    })
}
