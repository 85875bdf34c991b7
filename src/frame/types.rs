use image::{DynamicImage, ImageBuffer, Rgba32FImage, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA in [0, 1]
pub type Rgba = [f32; 4];

pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Rectangle in absolute pixel coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Extent anchored at the origin
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the last column
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// One past the last row
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two extents; empty (zero-sized) when they do not touch
    pub fn intersect(&self, other: &Extent) -> Extent {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            return Extent::new(x0, y0, 0, 0);
        }
        Extent::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    /// Smallest extent covering both
    pub fn union(&self, other: &Extent) -> Extent {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Extent::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Point in absolute pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A single frame of the pipeline
///
/// Wraps an `f32` RGBA image buffer together with the absolute position of
/// its top-left pixel. Kernels read frames and produce new ones.
#[derive(Clone, Debug)]
pub struct Frame {
    origin: (i32, i32),
    buffer: Rgba32FImage,
}

impl Frame {
    /// Create a frame at the origin from an RGBA buffer
    pub fn new(buffer: Rgba32FImage) -> Self {
        Self { origin: (0, 0), buffer }
    }

    /// Create a frame whose top-left pixel sits at `(x, y)`
    pub fn with_origin(buffer: Rgba32FImage, x: i32, y: i32) -> Self {
        Self { origin: (x, y), buffer }
    }

    /// Fully transparent frame covering `extent`
    pub fn new_transparent(extent: Extent) -> Self {
        Self::with_origin(ImageBuffer::new(extent.width, extent.height), extent.x, extent.y)
    }

    /// Frame at the origin filled with a single color
    pub fn new_filled(width: u32, height: u32, color: Rgba) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| image::Rgba(color));
        Self::new(buffer)
    }

    /// Build a frame by evaluating `f` at every absolute pixel of `extent`
    ///
    /// Rows are evaluated in parallel.
    pub fn render<F>(extent: Extent, f: F) -> Self
    where
        F: Fn(i32, i32) -> Rgba + Sync,
    {
        let mut buffer: Rgba32FImage = ImageBuffer::new(extent.width, extent.height);
        let row_len = extent.width as usize * 4;

        if row_len > 0 {
            let data: &mut [f32] = &mut buffer;
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(row, chunk)| {
                    let y = extent.y + row as i32;
                    for (col, px) in chunk.chunks_exact_mut(4).enumerate() {
                        px.copy_from_slice(&f(extent.x + col as i32, y));
                    }
                });
        }

        Self::with_origin(buffer, extent.x, extent.y)
    }

    /// Decode-side interop: any `image` buffer becomes an f32 frame
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::new(image.to_rgba32f())
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.origin.0, self.origin.1, self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.extent().is_empty()
    }

    /// Pixel at local coordinates
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.buffer.get_pixel(x, y).0
    }

    /// Pixel at absolute coordinates, `None` outside the extent
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<Rgba> {
        if !self.extent().contains(x, y) {
            return None;
        }
        Some(self.pixel((x - self.origin.0) as u32, (y - self.origin.1) as u32))
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &Rgba32FImage {
        &self.buffer
    }

    /// Apply `f` to every pixel, producing a new frame with the same extent
    ///
    /// `f` receives local coordinates and the source pixel.
    pub fn map_pixels<F>(&self, f: F) -> Frame
    where
        F: Fn(u32, u32, Rgba) -> Rgba + Sync,
    {
        let mut buffer = self.buffer.clone();
        let row_len = self.width() as usize * 4;

        if row_len > 0 {
            let data: &mut [f32] = &mut buffer;
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, px) in row.chunks_exact_mut(4).enumerate() {
                        let out = f(x as u32, y as u32, [px[0], px[1], px[2], px[3]]);
                        px.copy_from_slice(&out);
                    }
                });
        }

        Frame::with_origin(buffer, self.origin.0, self.origin.1)
    }

    /// Encode-side interop: clamp and quantize to 8-bit RGBA
    pub fn to_rgba8(&self) -> RgbaImage {
        DynamicImage::ImageRgba32F(self.buffer.clone()).to_rgba8()
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_rgba8().save(path)
    }
}
