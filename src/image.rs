use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

/// Linear-light RGBA color with channels in [0, 1]. Quantization to 8-bit
/// happens only at the film boundary, via `to_u8`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Clamps an f32 value to [0, 1], multiplies it by 255 and rounds to the
/// nearest u8. Returns 0 if `f` is NaN.
fn saturate_cast_u8(f: f32) -> u8 {
    if f >= 1.0 {
        255
    } else if f >= 0.0 {
        (f * 255.0).round() as u8
    } else {
        0
    }
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }
    pub const fn opaque(r: f32, g: f32, b: f32) -> Color {
        Color::new(r, g, b, 1.0)
    }
    pub const fn black() -> Color {
        Color::opaque(0.0, 0.0, 0.0)
    }
    pub fn to_u8(&self) -> [u8; 4] {
        [
            saturate_cast_u8(self.r),
            saturate_cast_u8(self.g),
            saturate_cast_u8(self.b),
            saturate_cast_u8(self.a),
        ]
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to create image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("png encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// Encodes a width x height x RGBA8 buffer as a PNG file.
pub fn write_png(path: &Path, width: u32, height: u32, data: &[u8]) -> Result<(), ImageError> {
    let file = File::create(path)?;
    let ref mut w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::RGBA);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quantization_rounds_to_nearest() {
        assert_eq!(saturate_cast_u8(0.0), 0);
        assert_eq!(saturate_cast_u8(1.0), 255);
        // 0.5 * 255 = 127.5; rounding, not truncation.
        assert_eq!(saturate_cast_u8(0.5), 128);
        assert_eq!(saturate_cast_u8(0.25), 64);
    }

    #[test]
    fn quantization_clamps_out_of_range() {
        assert_eq!(saturate_cast_u8(2.5), 255);
        assert_eq!(saturate_cast_u8(-0.75), 0);
        assert_eq!(saturate_cast_u8(f32::NAN), 0);
    }

    #[test]
    fn opaque_colors_carry_full_alpha() {
        let c = Color::opaque(0.1, 0.2, 0.3);
        assert_eq!(c.to_u8()[3], 255);
    }
}
