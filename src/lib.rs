//! Per-pixel "liquid glass" effects over RGBA8 bitmaps: radial chromatic
//! dispersion, lens refraction, gamma and color adjustment.
//!
//! Every kernel is a pure function of `(source surface, pixel coordinate,
//! parameters)`. Kernels read a borrowed [`surface::Surface`] and return a new
//! one of identical dimensions; rows are evaluated in parallel.

pub mod color;
pub mod decoding;
pub mod dispersion;
pub mod displacement;
pub mod encoding;
pub mod error;
pub mod error_codes;
pub mod gamma;
pub mod manifest;
pub mod refraction;
pub mod schema;
pub mod stack;
pub mod surface;

pub use color::{apply_color, ColorParams};
pub use dispersion::{apply_dispersion, ChannelSplit, DispersionParams};
pub use displacement::{DisplacementField, FalloffDirection};
pub use error::EffectError;
pub use gamma::apply_gamma;
pub use refraction::{apply_refraction, RefractionParams};
pub use stack::{EffectStack, EffectStage};
pub use surface::{Rgba, Surface};
