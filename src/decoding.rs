use std::path::Path;

use anyhow::{Context, Result};

use crate::error_codes::CodedError;
use crate::surface::Surface;

/// Decode any supported bitmap file into an RGBA8 surface.
pub fn load_surface(path: &Path) -> Result<Surface> {
    let image = image::open(path)
        .map_err(|error| CodedError::io(format!("{error}")))
        .with_context(|| format!("failed to decode bitmap {}", path.display()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("decoded {} ({}x{})", path.display(), width, height);
    Surface::from_rgba(width, height, rgba.into_raw())
        .with_context(|| format!("bitmap {} is not a usable surface", path.display()))
}
