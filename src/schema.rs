use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::color::ColorParams;
use crate::dispersion::{ChannelSplit, DispersionParams};
use crate::displacement::FalloffDirection;
use crate::refraction::RefractionParams;
use crate::stack::{EffectStack, EffectStage};

pub const STACK_MANIFEST_VERSION: u32 = 1;

/// Upper bound applied to dispersion and refraction intensities read from a
/// manifest. Larger values are clamped with a warning.
pub const MAX_INTENSITY: f32 = 0.1;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackManifest {
    pub version: u32,
    pub stages: Vec<StageSpec>,
}

impl StackManifest {
    pub fn validate(&self) -> Result<()> {
        if self.version != STACK_MANIFEST_VERSION {
            bail!(
                "unsupported stack manifest version {} (expected {})",
                self.version,
                STACK_MANIFEST_VERSION
            );
        }
        if self.stages.is_empty() {
            bail!("stack manifest must define at least one stage");
        }
        for (index, stage) in self.stages.iter().enumerate() {
            stage
                .to_stage()
                .validate()
                .with_context(|| format!("invalid stage {index} ({})", stage.name()))?;
        }
        Ok(())
    }

    /// Build the runtime stack, clamping intensities to [`MAX_INTENSITY`].
    pub fn to_stack(&self) -> EffectStack {
        let stages = self
            .stages
            .iter()
            .enumerate()
            .map(|(index, stage)| clamp_intensity(index, stage.to_stage()))
            .collect();
        EffectStack::new(stages)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StageSpec {
    Refraction {
        intensity: f32,
        #[serde(default)]
        depth_effect: bool,
        #[serde(default)]
        falloff: FalloffDirection,
    },
    Dispersion {
        intensity: f32,
        #[serde(default)]
        split: ChannelSplit,
        #[serde(default)]
        falloff: FalloffDirection,
    },
    Color {
        #[serde(default = "default_scale")]
        saturation: f32,
        #[serde(default = "default_scale")]
        contrast: f32,
        #[serde(default)]
        brightness: f32,
    },
    Gamma {
        power: f32,
    },
}

fn default_scale() -> f32 {
    1.0
}

impl StageSpec {
    pub fn name(&self) -> &'static str {
        self.to_stage().name()
    }

    pub fn to_stage(&self) -> EffectStage {
        match *self {
            Self::Refraction {
                intensity,
                depth_effect,
                falloff,
            } => EffectStage::Refraction(RefractionParams {
                intensity,
                depth_effect,
                falloff,
            }),
            Self::Dispersion {
                intensity,
                split,
                falloff,
            } => EffectStage::Dispersion(DispersionParams {
                intensity,
                split,
                falloff,
            }),
            Self::Color {
                saturation,
                contrast,
                brightness,
            } => EffectStage::Color(ColorParams {
                saturation,
                contrast,
                brightness,
            }),
            Self::Gamma { power } => EffectStage::Gamma { power },
        }
    }
}

fn clamp_intensity(index: usize, stage: EffectStage) -> EffectStage {
    let clamp = |intensity: f32| {
        if intensity > MAX_INTENSITY {
            log::warn!(
                "stage {index} ({}): intensity {intensity} clamped to {MAX_INTENSITY}",
                stage.name()
            );
            MAX_INTENSITY
        } else {
            intensity
        }
    };

    match stage {
        EffectStage::Refraction(mut params) => {
            params.intensity = clamp(params.intensity);
            EffectStage::Refraction(params)
        }
        EffectStage::Dispersion(mut params) => {
            params.intensity = clamp(params.intensity);
            EffectStage::Dispersion(params)
        }
        other => other,
    }
}
