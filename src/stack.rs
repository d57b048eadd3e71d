//! Ordered chain of effect stages.
//!
//! Every stage is validated against the input dimensions before the first
//! pixel is touched. Stages then run sequentially; each one materializes a
//! fresh surface that becomes the next stage's read-only input, so no
//! gather ever reads a buffer that is still being written.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::color::{apply_color, ColorParams};
use crate::dispersion::{apply_dispersion, DispersionParams};
use crate::error::{validate_intensity, EffectError};
use crate::gamma::{apply_gamma, validate_power};
use crate::refraction::{apply_refraction, RefractionParams};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectStage {
    Refraction(RefractionParams),
    Dispersion(DispersionParams),
    Color(ColorParams),
    Gamma { power: f32 },
}

impl EffectStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Refraction(_) => "refraction",
            Self::Dispersion(_) => "dispersion",
            Self::Color(_) => "color",
            Self::Gamma { .. } => "gamma",
        }
    }

    pub fn validate(&self) -> Result<(), EffectError> {
        match self {
            Self::Refraction(params) => validate_intensity(params.intensity),
            Self::Dispersion(params) => validate_intensity(params.intensity),
            Self::Color(params) => params.validate(),
            Self::Gamma { power } => validate_power(*power),
        }
    }

    pub fn apply(&self, surface: &Surface) -> Result<Surface, EffectError> {
        match self {
            Self::Refraction(params) => apply_refraction(surface, params),
            Self::Dispersion(params) => apply_dispersion(surface, params),
            Self::Color(params) => apply_color(surface, params),
            Self::Gamma { power } => apply_gamma(surface, *power),
        }
    }
}

/// A stage that failed validation or dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackError {
    pub index: usize,
    pub stage: &'static str,
    pub source: EffectError,
}

impl Display for StackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {} ({}): {}", self.index, self.stage, self.source)
    }
}

impl Error for StackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectStack {
    stages: Vec<EffectStage>,
}

impl EffectStack {
    pub fn new(stages: Vec<EffectStage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[EffectStage] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(EffectStage::name).collect()
    }

    pub fn validate(&self) -> Result<(), StackError> {
        for (index, stage) in self.stages.iter().enumerate() {
            stage.validate().map_err(|source| StackError {
                index,
                stage: stage.name(),
                source,
            })?;
        }
        Ok(())
    }

    /// Run every stage in order. An empty stack returns a copy of the input.
    pub fn apply(&self, surface: &Surface) -> Result<Surface, StackError> {
        self.validate()?;

        let mut current = surface.clone();
        for (index, stage) in self.stages.iter().enumerate() {
            log::debug!("stack stage {index}: {}", stage.name());
            current = stage.apply(&current).map_err(|source| StackError {
                index,
                stage: stage.name(),
                source,
            })?;
        }
        Ok(current)
    }
}
