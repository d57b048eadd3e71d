use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;

use crate::error_codes::CodedError;
use crate::surface::Surface;

/// Encode a surface to `path`; the format follows the file extension.
pub fn save_surface(surface: &Surface, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|error| CodedError::io(format!("{error}")))
                .with_context(|| format!("failed to create output dir {}", parent.display()))?;
        }
    }

    let image = RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.as_bytes().to_vec(),
    )
    .ok_or_else(|| anyhow!("surface buffer does not match its dimensions"))?;

    image
        .save(path)
        .map_err(|error| CodedError::io(format!("{error}")))
        .with_context(|| format!("failed to encode {}", path.display()))?;
    log::debug!("encoded {} ({}x{})", path.display(), surface.width(), surface.height());
    Ok(())
}
