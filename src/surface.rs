//! Owned RGBA8 bitmap surface and the per-pixel dispatch shared by every kernel.
//!
//! Pixels are stored row-major with a top-left origin, 4 bytes per pixel.
//! Kernels never write into the surface they read from: [`Surface::map_pixels`]
//! always materializes a fresh destination buffer, so a stage's output can
//! only be read once it is complete.

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::error::EffectError;

/// One RGBA pixel, 8 bits per channel.
pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Wrap a flat RGBA byte buffer.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EffectError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(EffectError::BufferLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A surface where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, EffectError> {
        let len = byte_len(width, height)?;
        let data = color.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a surface by evaluating `f` at every pixel coordinate.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self, EffectError>
    where
        F: Fn(u32, u32) -> Rgba + Sync,
    {
        let len = byte_len(width, height)?;
        let mut data = vec![0_u8; len];
        fill_rows(&mut data, width as usize, f);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel view of the underlying bytes.
    pub fn pixels(&self) -> &[Rgba] {
        bytemuck::cast_slice(&self.data)
    }

    /// Read an in-bounds pixel.
    #[inline(always)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels()[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Clamp-to-edge: map any integer coordinate to the nearest in-bounds one.
    #[inline(always)]
    pub fn clamp_coordinate(&self, x: i64, y: i64) -> (u32, u32) {
        let cx = x.clamp(0, i64::from(self.width) - 1);
        let cy = y.clamp(0, i64::from(self.height) - 1);
        (cx as u32, cy as u32)
    }

    /// The single sampling contract used by the kernels:
    /// `(surface, coordinate) -> color`, with the coordinate clamped first.
    #[inline(always)]
    pub fn sample_clamped(&self, x: i64, y: i64) -> Rgba {
        let (cx, cy) = self.clamp_coordinate(x, y);
        self.pixel(cx, cy)
    }

    /// Dispatch `kernel` over every pixel and collect the results into a new
    /// surface of identical dimensions. Rows are filled in parallel; the
    /// kernel only sees `self` immutably, so evaluation order is irrelevant.
    pub fn map_pixels<F>(&self, kernel: F) -> Surface
    where
        F: Fn(u32, u32) -> Rgba + Sync,
    {
        let mut data = vec![0_u8; self.data.len()];
        fill_rows(&mut data, self.width as usize, kernel);
        Surface {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Hex sha256 over the raw pixel bytes.
    pub fn sha256_hex(&self) -> String {
        let digest = Sha256::digest(&self.data);
        let mut out = String::with_capacity(digest.len() * 2);
        for byte in digest {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, EffectError> {
    if width == 0 || height == 0 {
        return Err(EffectError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(4))
        .ok_or(EffectError::DimensionsOverflow)
}

fn fill_rows<F>(data: &mut [u8], width: usize, kernel: F)
where
    F: Fn(u32, u32) -> Rgba + Sync,
{
    data.par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let row: &mut [Rgba] = bytemuck::cast_slice_mut(row);
            for (x, px) in row.iter_mut().enumerate() {
                *px = kernel(x as u32, y as u32);
            }
        });
}

/// 8-bit channel to normalized float.
#[inline(always)]
pub fn unpack_channel(value: u8) -> f32 {
    f32::from(value) / 255.0
}

/// Normalized float to 8-bit channel, clamped and rounded to nearest.
#[inline(always)]
pub fn pack_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
