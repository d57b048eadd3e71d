//! Validation failures raised by the effect kernels.
//!
//! Every variant is produced synchronously, before a kernel touches a single
//! pixel. A kernel that returns an error has produced no output.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectError {
    /// Width or height is zero.
    InvalidDimensions { width: u32, height: u32 },
    /// A scalar parameter is outside its accepted domain.
    InvalidParameter {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
    DimensionsOverflow,
    BufferLengthMismatch { expected: usize, actual: usize },
}

impl EffectError {
    pub(crate) fn invalid(name: &'static str, value: f32, expected: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            expected,
        }
    }

    /// True for every variant the caller could fix by changing configuration.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::InvalidDimensions { .. }
        )
    }
}

impl Display for EffectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "surface dimensions must be positive, got {width}x{height}")
            }
            Self::InvalidParameter {
                name,
                value,
                expected,
            } => write!(f, "invalid parameter '{name}': {value} (expected {expected})"),
            Self::DimensionsOverflow => write!(f, "surface dimensions overflowed usize"),
            Self::BufferLengthMismatch { expected, actual } => write!(
                f,
                "RGBA buffer length mismatch: expected {expected} bytes, got {actual} bytes"
            ),
        }
    }
}

impl Error for EffectError {}

/// Intensity must be finite and non-negative.
pub(crate) fn validate_intensity(intensity: f32) -> Result<(), EffectError> {
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(EffectError::invalid(
            "intensity",
            intensity,
            "a finite value >= 0",
        ));
    }
    Ok(())
}
