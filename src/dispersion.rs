//! Radial chromatic dispersion: color channels sampled at independently
//! displaced coordinates.

use serde::Deserialize;

use crate::displacement::{DisplacementField, FalloffDirection};
use crate::error::EffectError;
use crate::surface::{Rgba, Surface};

/// How the color channels are split apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSplit {
    /// Red shifted right and blue shifted left along the row by
    /// `magnitude * width`; green stays anchored at the source pixel.
    #[default]
    Axis,
    /// Red displaced along the full radial vector, green along half of it;
    /// blue stays anchored at the source pixel.
    Radial,
}

/// Green offset as a fraction of the red offset in [`ChannelSplit::Radial`].
pub const RADIAL_GREEN_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispersionParams {
    pub intensity: f32,
    pub split: ChannelSplit,
    pub falloff: FalloffDirection,
}

impl Default for DispersionParams {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            split: ChannelSplit::Axis,
            falloff: FalloffDirection::Rising,
        }
    }
}

/// Source coordinates each output channel is read from, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCoordinates {
    pub red: (i64, i64),
    pub green: (i64, i64),
    pub blue: (i64, i64),
}

/// Compute the per-channel sample coordinates for one output pixel. Reads
/// go through [`Surface::sample_clamped`], which owns the clamp.
pub fn channel_coordinates(
    surface: &Surface,
    field: &DisplacementField,
    split: ChannelSplit,
    x: u32,
    y: u32,
) -> ChannelCoordinates {
    let displacement = field.at(x, y);
    match split {
        ChannelSplit::Axis => {
            let dx = (displacement.magnitude * surface.width() as f32) as i64;
            let x = i64::from(x);
            let y = i64::from(y);
            ChannelCoordinates {
                red: (x.saturating_add(dx), y),
                green: (x, y),
                blue: (x.saturating_sub(dx), y),
            }
        }
        ChannelSplit::Radial => {
            ChannelCoordinates {
                red: displacement.vector.apply_to(x, y),
                green: displacement
                    .vector
                    .scaled(RADIAL_GREEN_SCALE)
                    .apply_to(x, y),
                blue: (i64::from(x), i64::from(y)),
            }
        }
    }
}

/// Apply radial dispersion. Returns a new surface of identical dimensions.
pub fn apply_dispersion(
    surface: &Surface,
    params: &DispersionParams,
) -> Result<Surface, EffectError> {
    let field = DisplacementField::new(
        surface.width(),
        surface.height(),
        params.intensity,
        params.falloff,
        false,
    )?;

    if params.intensity == 0.0 {
        return Ok(surface.clone());
    }

    log::debug!(
        "dispersion: {}x{} intensity={} split={:?} falloff={:?}",
        surface.width(),
        surface.height(),
        params.intensity,
        params.split,
        params.falloff
    );

    Ok(surface.map_pixels(|x, y| disperse_pixel(surface, &field, params.split, x, y)))
}

#[inline(always)]
fn disperse_pixel(
    surface: &Surface,
    field: &DisplacementField,
    split: ChannelSplit,
    x: u32,
    y: u32,
) -> Rgba {
    let coords = channel_coordinates(surface, field, split, x, y);
    let source = surface.pixel(x, y);
    let red = surface.sample_clamped(coords.red.0, coords.red.1);
    let green = surface.sample_clamped(coords.green.0, coords.green.1);
    let blue = surface.sample_clamped(coords.blue.0, coords.blue.1);
    [red[0], green[1], blue[2], source[3]]
}
