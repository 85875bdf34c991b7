//! Synthetic source images used as auxiliary inputs

use rand::Rng;

use crate::config::EngineConfig;
use crate::frame::{Extent, Frame, Point};

/// Width of one checkerboard square in pixels
pub const CHECKER_WIDTH: f32 = 80.0;

/// Point the checkerboard grid is aligned on
pub const CHECKER_CENTER: Point = Point { x: 150.0, y: 150.0 };

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit(hash: u64, channel: u64) -> f32 {
    (splitmix(hash ^ channel.wrapping_mul(0xA24B_AED4_963E_E407)) >> 40) as f32 / (1u64 << 24) as f32
}

/// Uniform value in `[0, 1)` fixed for a lattice cell and channel
pub fn lattice_unit(i: i64, j: i64, channel: u64) -> f32 {
    let cell = ((i as u64) << 32) ^ (j as u64 & 0xFFFF_FFFF);
    unit(splitmix(cell), channel)
}

/// Opaque per-pixel noise over `extent`
///
/// The value at an absolute pixel depends only on `(x, y, seed)`, so two
/// fields with the same seed agree wherever they overlap.
pub fn random_noise(extent: Extent, seed: u64) -> Frame {
    Frame::render(extent, |x, y| {
        let cell = ((x as u32 as u64) << 32) | (y as u32 as u64);
        let hash = splitmix(cell ^ seed);
        [unit(hash, 1), unit(hash, 2), unit(hash, 3), 1.0]
    })
}

/// White/black squares over `extent`, aligned on [`CHECKER_CENTER`]
pub fn checkerboard(extent: Extent) -> Frame {
    Frame::render(extent, |x, y| {
        let cx = ((x as f32 + 0.5 - CHECKER_CENTER.x) / CHECKER_WIDTH).floor() as i64;
        let cy = ((y as f32 + 0.5 - CHECKER_CENTER.y) / CHECKER_WIDTH).floor() as i64;
        if (cx + cy).rem_euclid(2) == 0 {
            [1.0, 1.0, 1.0, 1.0]
        } else {
            [0.0, 0.0, 0.0, 1.0]
        }
    })
}

/// Stops of the color map gradient, dark to light
const HEAT_STOPS: [(f32, [f32; 3]); 4] = [
    (0.0, [0.0, 0.0, 0.0]),
    (1.0 / 3.0, [0.8, 0.0, 0.0]),
    (2.0 / 3.0, [1.0, 0.85, 0.0]),
    (1.0, [1.0, 1.0, 1.0]),
];

/// Horizontal strip the color map filter looks luminance up in
///
/// Black through red and yellow to white, 256 pixels wide and one high.
pub fn color_map_gradient() -> Frame {
    Frame::render(Extent::from_size(256, 1), |x, _| {
        let t = x as f32 / 255.0;
        let mut color = HEAT_STOPS[0].1;
        for pair in HEAT_STOPS.windows(2) {
            let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
            if t >= t0 && t <= t1 {
                let k = (t - t0) / (t1 - t0);
                color = [
                    c0[0] + (c1[0] - c0[0]) * k,
                    c0[1] + (c1[1] - c0[1]) * k,
                    c0[2] + (c1[2] - c0[2]) * k,
                ];
                break;
            }
        }
        [color[0], color[1], color[2], 1.0]
    })
}

/// Square window into the noise field used by the static overlay
///
/// Side length in `[static_min_size, static_max_size]`, top-left corner in
/// `[0, static_max_offset]` on each axis.
pub fn static_region<R: Rng + ?Sized>(rng: &mut R, config: &EngineConfig) -> Extent {
    let min = config.static_min_size.max(1);
    let max = config.static_max_size.max(min);
    let size = rng.gen_range(min..=max);
    let x = rng.gen_range(0..=config.static_max_offset);
    let y = rng.gen_range(0..=config.static_max_offset);
    Extent::new(x as i32, y as i32, size, size)
}

/// Seed of the noise field the glass texture is cut from
pub const GLASS_NOISE_SEED: u64 = 0x6C61_7373;

/// Offset of the glass texture window into the noise field
pub const GLASS_NOISE_OFFSET: i32 = 100;

/// Side length of the glass texture window
pub const GLASS_TEXTURE_SIZE: u32 = 100;

/// Fixed noise window refracted by the glass filter
///
/// A `GLASS_TEXTURE_SIZE` square cut from the field at
/// `GLASS_NOISE_OFFSET`, placed at the top-left of `target` and cropped to
/// it. Frames larger than the window are only partly covered.
pub fn glass_texture(target: Extent) -> Frame {
    let window = Extent::new(GLASS_NOISE_OFFSET, GLASS_NOISE_OFFSET, GLASS_TEXTURE_SIZE, GLASS_TEXTURE_SIZE);
    random_noise(window, GLASS_NOISE_SEED)
        .moved_to(target.x, target.y)
        .cropped(target)
}

/// Random glitch overlay shift, each axis in `[-glitch_max_offset, glitch_max_offset]`
///
/// A negative or non-finite limit means no shift.
pub fn glitch_offset<R: Rng + ?Sized>(rng: &mut R, config: &EngineConfig) -> Point {
    let max = config.glitch_max_offset;
    if !max.is_finite() || max <= 0.0 {
        return Point::new(0.0, 0.0);
    }
    Point::new(rng.gen_range(-max..=max), rng.gen_range(-max..=max))
}

/// Noise frame covering `target`, cut from a random window of the field
pub fn static_noise<R: Rng + ?Sized>(rng: &mut R, config: &EngineConfig, target: Extent) -> Frame {
    let region = static_region(rng, config);
    let seed = rng.gen::<u64>();
    random_noise(region, seed)
        .resized(target.width, target.height)
        .moved_to(target.x, target.y)
}
