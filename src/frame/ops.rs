use image::imageops::{self, FilterType};

use super::types::{Extent, Frame, Point, Rgba, TRANSPARENT};

/// Source-over blend of one straight-alpha pixel onto another
pub fn blend_over(fg: Rgba, bg: Rgba) -> Rgba {
    let a = fg[3];
    let inv = 1.0 - a;
    [
        fg[0] * a + bg[0] * inv,
        fg[1] * a + bg[1] * inv,
        fg[2] * a + bg[2] * inv,
        a + bg[3] * inv,
    ]
}

fn lerp4(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

impl Frame {
    /// Restrict the frame to `rect`; the result covers the overlap only
    pub fn cropped(&self, rect: Extent) -> Frame {
        let extent = self.extent();
        let overlap = extent.intersect(&rect);
        if overlap == extent {
            return self.clone();
        }
        if overlap.is_empty() {
            return Frame::new_transparent(Extent::new(overlap.x, overlap.y, 0, 0));
        }

        let local_x = (overlap.x - extent.x) as u32;
        let local_y = (overlap.y - extent.y) as u32;
        let sub = imageops::crop_imm(self.as_image(), local_x, local_y, overlap.width, overlap.height)
            .to_image();
        Frame::with_origin(sub, overlap.x, overlap.y)
    }

    /// Move the frame by whole pixels (fractions are rounded)
    pub fn translated(&self, dx: f32, dy: f32) -> Frame {
        let (x, y) = self.origin();
        self.moved_to(x + dx.round() as i32, y + dy.round() as i32)
    }

    /// Same pixels, new top-left position
    pub fn moved_to(&self, x: i32, y: i32) -> Frame {
        Frame::with_origin(self.as_image().clone(), x, y)
    }

    /// Scale to `width` x `height`, keeping the origin
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        let (x, y) = self.origin();
        if width == self.width() && height == self.height() {
            return self.clone();
        }
        if width == 0 || height == 0 || self.is_empty() {
            return Frame::new_transparent(Extent::new(x, y, width, height));
        }

        let resized = imageops::resize(self.as_image(), width, height, FilterType::Triangle);
        Frame::with_origin(resized, x, y)
    }

    /// Multiply the alpha channel by `opacity`
    pub fn with_opacity(&self, opacity: f32) -> Frame {
        let opacity = opacity.clamp(0.0, 1.0);
        self.map_pixels(|_, _, p| [p[0], p[1], p[2], p[3] * opacity])
    }

    /// Composite `self` over `background`
    ///
    /// The output covers the union of both extents; callers that need the
    /// background extent crop explicitly.
    pub fn source_over(&self, background: &Frame) -> Frame {
        let extent = self.extent().union(&background.extent());
        Frame::render(extent, |x, y| {
            let fg = self.pixel_at(x, y).unwrap_or(TRANSPARENT);
            let bg = background.pixel_at(x, y).unwrap_or(TRANSPARENT);
            blend_over(fg, bg)
        })
    }

    /// Bilinear sample at absolute coordinates, clamping to the edges
    pub fn sample(&self, at: Point) -> Rgba {
        if self.is_empty() {
            return TRANSPARENT;
        }
        let (ox, oy) = self.origin();
        let max_x = (self.width() - 1) as f32;
        let max_y = (self.height() - 1) as f32;

        // Pixel centers sit at +0.5
        let fx = (at.x - ox as f32 - 0.5).clamp(0.0, max_x);
        let fy = (at.y - oy as f32 - 0.5).clamp(0.0, max_y);

        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width() - 1);
        let y1 = (y0 + 1).min(self.height() - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let top = lerp4(self.pixel(x0, y0), self.pixel(x1, y0), tx);
        let bottom = lerp4(self.pixel(x0, y1), self.pixel(x1, y1), tx);
        lerp4(top, bottom, ty)
    }

    /// Bilinear sample that is transparent outside the frame
    pub fn sample_inside(&self, at: Point) -> Rgba {
        let extent = self.extent();
        if at.x < extent.x as f32
            || at.y < extent.y as f32
            || at.x >= extent.right() as f32
            || at.y >= extent.bottom() as f32
        {
            return TRANSPARENT;
        }
        self.sample(at)
    }

    /// Nearest-pixel sample at absolute coordinates, clamping to the edges
    pub fn sample_nearest(&self, at: Point) -> Rgba {
        if self.is_empty() {
            return TRANSPARENT;
        }
        let (ox, oy) = self.origin();
        let lx = (at.x.floor() as i64 - ox as i64).clamp(0, self.width() as i64 - 1) as u32;
        let ly = (at.y.floor() as i64 - oy as i64).clamp(0, self.height() as i64 - 1) as u32;
        self.pixel(lx, ly)
    }
}
