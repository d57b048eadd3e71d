//! Saturation, contrast and brightness adjustment.
//!
//! Applied as a 3x3 saturation matrix followed by a contrast scale about
//! mid-gray and an additive brightness offset, all in normalized units.
//! Alpha is carried through.

use crate::error::EffectError;
use crate::surface::{pack_channel, unpack_channel, Surface};

const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorParams {
    pub saturation: f32,
    pub contrast: f32,
    /// Additive offset in normalized units.
    pub brightness: f32,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            contrast: 1.0,
            brightness: 0.0,
        }
    }
}

impl ColorParams {
    pub fn validate(&self) -> Result<(), EffectError> {
        for (name, value) in [("saturation", self.saturation), ("contrast", self.contrast)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EffectError::InvalidParameter {
                    name,
                    value,
                    expected: "a finite value >= 0",
                });
            }
        }
        if !self.brightness.is_finite() || !(-1.0..=1.0).contains(&self.brightness) {
            return Err(EffectError::InvalidParameter {
                name: "brightness",
                value: self.brightness,
                expected: "a finite value in [-1, 1]",
            });
        }
        Ok(())
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    fn saturation_matrix(&self) -> [[f32; 3]; 3] {
        let s = self.saturation;
        let inv = 1.0 - s;
        let (r, g, b) = (LUMA_R * inv, LUMA_G * inv, LUMA_B * inv);
        [
            [r + s, g, b],
            [r, g + s, b],
            [r, g, b + s],
        ]
    }
}

pub fn apply_color(surface: &Surface, params: &ColorParams) -> Result<Surface, EffectError> {
    params.validate()?;
    if params.is_neutral() {
        return Ok(surface.clone());
    }

    log::debug!(
        "color: {}x{} saturation={} contrast={} brightness={}",
        surface.width(),
        surface.height(),
        params.saturation,
        params.contrast,
        params.brightness
    );

    let matrix = params.saturation_matrix();
    let contrast = params.contrast;
    let brightness = params.brightness;
    Ok(surface.map_pixels(|x, y| {
        let [r, g, b, a] = surface.pixel(x, y);
        let rgb = [unpack_channel(r), unpack_channel(g), unpack_channel(b)];
        let mut out = [0_u8; 4];
        for (channel, row) in matrix.iter().enumerate() {
            let saturated = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
            out[channel] = pack_channel((saturated - 0.5) * contrast + 0.5 + brightness);
        }
        out[3] = a;
        out
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Surface {
        Surface::from_fn(8, 4, |x, y| [(x * 31) as u8, (y * 60) as u8, 90, 77]).expect("surface")
    }

    #[test]
    fn neutral_params_are_identity() {
        let surface = palette();
        let out = apply_color(&surface, &ColorParams::default()).expect("color");
        assert_eq!(out, surface);
    }

    #[test]
    fn zero_saturation_is_grayscale() {
        let surface = palette();
        let params = ColorParams {
            saturation: 0.0,
            ..ColorParams::default()
        };
        let out = apply_color(&surface, &params).expect("color");
        for px in out.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 77);
        }
    }

    #[test]
    fn brightness_offsets_and_clamps() {
        let surface = Surface::filled(2, 2, [0, 128, 250, 255]).expect("surface");
        let params = ColorParams {
            brightness: 0.1,
            ..ColorParams::default()
        };
        let out = apply_color(&surface, &params).expect("color");
        let px = out.pixel(0, 0);
        assert_eq!(px[0], 26);
        assert_eq!(px[2], 255);
    }

    #[test]
    fn zero_contrast_collapses_to_mid_gray() {
        let surface = palette();
        let params = ColorParams {
            contrast: 0.0,
            ..ColorParams::default()
        };
        let out = apply_color(&surface, &params).expect("color");
        for px in out.pixels() {
            assert_eq!(&px[..3], &[128, 128, 128]);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            ColorParams {
                saturation: -0.5,
                ..ColorParams::default()
            },
            ColorParams {
                contrast: f32::NAN,
                ..ColorParams::default()
            },
            ColorParams {
                brightness: 1.5,
                ..ColorParams::default()
            },
        ];
        for params in bad {
            assert!(params.validate().is_err(), "{params:?} should be rejected");
        }
    }
}
