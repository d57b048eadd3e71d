//! Radial displacement field shared by the dispersion and refraction kernels.
//!
//! A pixel coordinate is normalized into a centered `[-1, 1]` space, its
//! distance from the image center is shaped by a smoothstep falloff, and the
//! result is scaled by the effect intensity.

use serde::Deserialize;

use crate::error::{validate_intensity, EffectError};

/// Orientation of the smoothstep falloff curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffDirection {
    /// 0 at the center, rising to 1 at `dist >= 1`.
    #[default]
    #[serde(alias = "center_weighted")]
    Rising,
    /// 1 at the center, falling to 0 at `dist >= 1`.
    #[serde(alias = "edge_weighted")]
    Falling,
}

impl FalloffDirection {
    #[inline(always)]
    pub fn evaluate(self, dist: f32) -> f32 {
        let rising = smoothstep(0.0, 1.0, dist);
        match self {
            Self::Rising => rising,
            Self::Falling => 1.0 - rising,
        }
    }
}

/// Hermite interpolation between `edge0` and `edge1`, clamped to `[0, 1]`.
#[inline(always)]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pixel coordinate remapped to `[-1, 1]` around the image middle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedCoordinate {
    pub x: f32,
    pub y: f32,
}

impl NormalizedCoordinate {
    pub fn from_pixel(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: (x as f32 / width as f32) * 2.0 - 1.0,
            y: (y as f32 / height as f32) * 2.0 - 1.0,
        }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Pixel-space offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementVector {
    pub dx: f32,
    pub dy: f32,
}

impl DisplacementVector {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }

    /// Target coordinate for a source pixel, truncated toward zero per axis.
    /// Huge offsets saturate instead of wrapping, so clamping still lands on
    /// the edge the offset points at.
    #[inline(always)]
    pub fn apply_to(self, x: u32, y: u32) -> (i64, i64) {
        (
            i64::from(x).saturating_add(self.dx as i64),
            i64::from(y).saturating_add(self.dy as i64),
        )
    }
}

/// Displacement evaluated at one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub centered: NormalizedCoordinate,
    pub falloff: f32,
    /// `falloff * intensity`, with the depth gradient applied when enabled.
    pub magnitude: f32,
    /// Pixel-space vector aligned with `centered`, scaled by `magnitude`.
    pub vector: DisplacementVector,
}

/// Immutable displacement configuration bound for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementField {
    width: u32,
    height: u32,
    intensity: f32,
    falloff: FalloffDirection,
    depth_effect: bool,
}

impl DisplacementField {
    pub fn new(
        width: u32,
        height: u32,
        intensity: f32,
        falloff: FalloffDirection,
        depth_effect: bool,
    ) -> Result<Self, EffectError> {
        if width == 0 || height == 0 {
            return Err(EffectError::InvalidDimensions { width, height });
        }
        validate_intensity(intensity)?;
        Ok(Self {
            width,
            height,
            intensity,
            falloff,
            depth_effect,
        })
    }

    pub fn at(&self, x: u32, y: u32) -> Displacement {
        let centered = NormalizedCoordinate::from_pixel(x, y, self.width, self.height);
        let falloff = self.falloff.evaluate(centered.length());
        let mut magnitude = falloff * self.intensity;
        if self.depth_effect {
            let uv_y = y as f32 / self.height as f32;
            magnitude *= 1.0 - uv_y;
        }

        let vector = DisplacementVector {
            dx: centered.x * magnitude * self.width as f32,
            dy: centered.y * magnitude * self.height as f32,
        };

        Displacement {
            centered,
            falloff,
            magnitude,
            vector,
        }
    }
}
