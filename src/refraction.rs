//! Lens-like refraction: every color channel is read from one displaced
//! coordinate, producing a spatial warp without color fringing.

use crate::displacement::{DisplacementField, DisplacementVector, FalloffDirection};
use crate::error::EffectError;
use crate::surface::{Rgba, Surface};

/// Constant fraction of the centered coordinate added to the offset when the
/// depth effect is enabled. Independent of the distance falloff.
pub const PARALLAX_BIAS: f32 = 0.02;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RefractionParams {
    pub intensity: f32,
    pub depth_effect: bool,
    pub falloff: FalloffDirection,
}

/// Pixel-space offset for one output pixel, before truncation.
pub fn refraction_offset(
    field: &DisplacementField,
    width: u32,
    height: u32,
    depth_effect: bool,
    x: u32,
    y: u32,
) -> DisplacementVector {
    let displacement = field.at(x, y);
    let mut offset = displacement.vector;
    if depth_effect {
        offset.dx += PARALLAX_BIAS * displacement.centered.x * width as f32;
        offset.dy += PARALLAX_BIAS * displacement.centered.y * height as f32;
    }
    offset
}

/// Apply refraction. Returns a new surface of identical dimensions.
///
/// Zero intensity skips the dispatch entirely, so the parallax bias never
/// shifts a surface that is not being refracted.
pub fn apply_refraction(
    surface: &Surface,
    params: &RefractionParams,
) -> Result<Surface, EffectError> {
    let (width, height) = (surface.width(), surface.height());
    let field = DisplacementField::new(
        width,
        height,
        params.intensity,
        params.falloff,
        params.depth_effect,
    )?;

    if params.intensity == 0.0 {
        return Ok(surface.clone());
    }

    log::debug!(
        "refraction: {}x{} intensity={} depth_effect={} falloff={:?}",
        width,
        height,
        params.intensity,
        params.depth_effect,
        params.falloff
    );

    Ok(surface.map_pixels(|x, y| {
        let offset = refraction_offset(&field, width, height, params.depth_effect, x, y);
        refract_pixel(surface, offset, x, y)
    }))
}

#[inline(always)]
fn refract_pixel(surface: &Surface, offset: DisplacementVector, x: u32, y: u32) -> Rgba {
    let (sx, sy) = offset.apply_to(x, y);
    let [r, g, b, _] = surface.sample_clamped(sx, sy);
    [r, g, b, surface.pixel(x, y)[3]]
}
