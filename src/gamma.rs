//! Power-law tone remap of the color channels.

use crate::error::EffectError;
use crate::surface::{pack_channel, unpack_channel, Surface};

/// Per-dispatch lookup table: `table[c] = pack((c / 255) ^ power)`.
#[derive(Debug, Clone)]
pub struct GammaTable {
    table: [u8; 256],
}

impl GammaTable {
    pub fn new(power: f32) -> Result<Self, EffectError> {
        validate_power(power)?;
        let mut table = [0_u8; 256];
        for (value, slot) in table.iter_mut().enumerate() {
            *slot = pack_channel(unpack_channel(value as u8).powf(power));
        }
        Ok(Self { table })
    }

    #[inline(always)]
    pub fn map(&self, value: u8) -> u8 {
        self.table[value as usize]
    }
}

pub fn validate_power(power: f32) -> Result<(), EffectError> {
    if !power.is_finite() || power <= 0.0 {
        return Err(EffectError::InvalidParameter {
            name: "power",
            value: power,
            expected: "a finite value > 0",
        });
    }
    Ok(())
}

/// Raise R, G and B to `power`; alpha is carried through.
pub fn apply_gamma(surface: &Surface, power: f32) -> Result<Surface, EffectError> {
    let table = GammaTable::new(power)?;
    if power == 1.0 {
        return Ok(surface.clone());
    }

    log::debug!(
        "gamma: {}x{} power={}",
        surface.width(),
        surface.height(),
        power
    );

    Ok(surface.map_pixels(|x, y| {
        let [r, g, b, a] = surface.pixel(x, y);
        [table.map(r), table.map(g), table.map(b), a]
    }))
}
