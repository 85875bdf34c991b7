//! 3D color lookup tables in the `.cube` text format

use std::path::Path;

use crate::error::AssetError;
use crate::frame::Frame;

use super::color::mix;

/// A cubic color table; red varies fastest, then green, then blue
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCube {
    dimension: usize,
    data: Vec<[f32; 3]>,
}

impl ColorCube {
    pub fn new(dimension: usize, data: Vec<[f32; 3]>) -> Result<Self, AssetError> {
        if dimension < 2 {
            return Err(AssetError::InvalidLut {
                reason: format!("dimension must be at least 2, got {}", dimension),
            });
        }
        let expected = dimension * dimension * dimension;
        if data.len() != expected {
            return Err(AssetError::InvalidLut {
                reason: format!("expected {} entries, found {}", expected, data.len()),
            });
        }
        Ok(Self { dimension, data })
    }

    /// Table that maps every color to itself
    pub fn identity(dimension: usize) -> Result<Self, AssetError> {
        let n = dimension.max(1);
        let step = 1.0 / (n.saturating_sub(1).max(1)) as f32;
        let mut data = Vec::with_capacity(n * n * n);
        for b in 0..n {
            for g in 0..n {
                for r in 0..n {
                    data.push([r as f32 * step, g as f32 * step, b as f32 * step]);
                }
            }
        }
        Self::new(dimension, data)
    }

    /// Parse `.cube` text
    ///
    /// Blank lines and lines starting with `#` are skipped. `TITLE`,
    /// `DOMAIN_MIN` and `DOMAIN_MAX` are accepted and ignored; the domain is
    /// always [0, 1].
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        let mut dimension = None;
        let mut data = Vec::new();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(first) = fields.next() else { continue };
            match first {
                "LUT_3D_SIZE" => {
                    let size = fields
                        .next()
                        .and_then(|v| v.parse::<usize>().ok())
                        .ok_or_else(|| AssetError::InvalidLut {
                            reason: format!("line {}: bad LUT_3D_SIZE", number + 1),
                        })?;
                    dimension = Some(size);
                }
                "TITLE" | "DOMAIN_MIN" | "DOMAIN_MAX" => {}
                "LUT_1D_SIZE" => {
                    return Err(AssetError::InvalidLut {
                        reason: "1D tables are not supported".to_string(),
                    });
                }
                _ => {
                    let row: Vec<f32> = std::iter::once(first)
                        .chain(fields)
                        .map(str::parse)
                        .collect::<Result<_, _>>()
                        .map_err(|e| AssetError::InvalidLut {
                            reason: format!("line {}: {}", number + 1, e),
                        })?;
                    if row.len() != 3 {
                        return Err(AssetError::InvalidLut {
                            reason: format!("line {}: expected 3 values, found {}", number + 1, row.len()),
                        });
                    }
                    data.push([row[0], row[1], row[2]]);
                }
            }
        }

        let dimension = dimension.ok_or_else(|| AssetError::InvalidLut {
            reason: "missing LUT_3D_SIZE".to_string(),
        })?;
        Self::new(dimension, data)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|_| AssetError::Missing {
            name: "color_lut".to_string(),
            path: path.display().to_string(),
        })?;
        Self::parse(&text)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn entry(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        let n = self.dimension;
        self.data[r + g * n + b * n * n]
    }

    /// Trilinear lookup of an RGB triple
    pub fn lookup(&self, rgb: [f32; 3]) -> [f32; 3] {
        let max = (self.dimension - 1) as f32;
        let mut base = [0usize; 3];
        let mut frac = [0.0f32; 3];
        for c in 0..3 {
            let pos = rgb[c].clamp(0.0, 1.0) * max;
            let i = (pos.floor() as usize).min(self.dimension - 2);
            base[c] = i;
            frac[c] = pos - i as f32;
        }

        let [r0, g0, b0] = base;
        let [tr, tg, tb] = frac;
        let mut out = [0.0; 3];
        for c in 0..3 {
            let c00 = mix(self.entry(r0, g0, b0)[c], self.entry(r0 + 1, g0, b0)[c], tr);
            let c10 = mix(self.entry(r0, g0 + 1, b0)[c], self.entry(r0 + 1, g0 + 1, b0)[c], tr);
            let c01 = mix(self.entry(r0, g0, b0 + 1)[c], self.entry(r0 + 1, g0, b0 + 1)[c], tr);
            let c11 = mix(self.entry(r0, g0 + 1, b0 + 1)[c], self.entry(r0 + 1, g0 + 1, b0 + 1)[c], tr);
            out[c] = mix(mix(c00, c10, tg), mix(c01, c11, tg), tb);
        }
        out
    }

    /// Map every pixel through the table, blended with the source by `intensity`
    pub fn apply(&self, frame: &Frame, intensity: f32) -> Frame {
        frame.map_pixels(|_, _, p| {
            let mapped = self.lookup([p[0], p[1], p[2]]);
            [
                mix(p[0], mapped[0], intensity),
                mix(p[1], mapped[1], intensity),
                mix(p[2], mapped[2], intensity),
                p[3],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const INVERT_2: &str = "# invert\nTITLE \"invert\"\nLUT_3D_SIZE 2\n\
        1 1 1\n0 1 1\n1 0 1\n0 0 1\n1 1 0\n0 1 0\n1 0 0\n0 0 0\n";

    #[test]
    fn test_parse_valid_cube() {
        let cube = ColorCube::parse(INVERT_2).unwrap();
        assert_eq!(cube.dimension(), 2);

        let out = cube.lookup([0.25, 0.5, 1.0]);
        assert!((out[0] - 0.75).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!(out[2].abs() < 1e-6);
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let text = "LUT_3D_SIZE 2\n0 0 0\n1 1 1\n";
        assert!(matches!(ColorCube::parse(text), Err(AssetError::InvalidLut { .. })));
    }

    #[test]
    fn test_missing_size_is_rejected() {
        assert!(ColorCube::parse("0 0 0\n").is_err());
        assert!(ColorCube::parse("LUT_3D_SIZE 2\n0 0\n").is_err());
    }

    #[test]
    fn test_identity_apply() {
        let cube = ColorCube::identity(17).unwrap();
        let frame = Frame::new_filled(3, 3, [0.1, 0.55, 0.9, 0.4]);
        let p = cube.apply(&frame, 1.0).pixel(1, 1);
        assert!((p[0] - 0.1).abs() < 1e-5);
        assert!((p[1] - 0.55).abs() < 1e-5);
        assert!((p[2] - 0.9).abs() < 1e-5);
        assert_eq!(p[3], 0.4);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(INVERT_2.as_bytes()).unwrap();
        let cube = ColorCube::from_file(file.path()).unwrap();
        assert_eq!(cube.dimension(), 2);

        assert!(matches!(
            ColorCube::from_file("does/not/exist.cube"),
            Err(AssetError::Missing { .. })
        ));
    }
}
