use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use glassfx::decoding::load_surface;
use glassfx::encoding::save_surface;
use glassfx::error_codes::{envelope_for, CodedError, INVALID_PARAMETER};
use glassfx::manifest::load_and_validate_stack;
use glassfx::stack::{EffectStack, EffectStage, StackError};
use glassfx::{ChannelSplit, ColorParams, DispersionParams, FalloffDirection, RefractionParams};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GLASSFX_GIT_HASH"),
    ")"
);

#[derive(Debug, Parser)]
#[command(name = "glassfx")]
#[command(about = "Liquid glass bitmap effects: dispersion, refraction, gamma")]
#[command(version = VERSION)]
struct Cli {
    /// Log every stage dispatch (overridden by GLASSFX_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Print machine-readable JSON on stdout, including errors.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a stack manifest over a bitmap.
    Apply {
        input: PathBuf,
        #[arg(long)]
        stack: PathBuf,
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },
    /// Validate a stack manifest without touching any bitmap.
    Check { stack: PathBuf },
    /// Run a single effect over a bitmap.
    Effect {
        input: PathBuf,
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
        #[command(subcommand)]
        effect: EffectCommand,
    },
}

#[derive(Debug, Subcommand)]
enum EffectCommand {
    Refraction {
        #[arg(long, allow_negative_numbers = true)]
        intensity: f32,
        #[arg(long)]
        depth_effect: bool,
        #[arg(long, value_enum, default_value_t = FalloffArg::Rising)]
        falloff: FalloffArg,
    },
    Dispersion {
        #[arg(long, allow_negative_numbers = true)]
        intensity: f32,
        #[arg(long, value_enum, default_value_t = SplitArg::Axis)]
        split: SplitArg,
        #[arg(long, value_enum, default_value_t = FalloffArg::Rising)]
        falloff: FalloffArg,
    },
    Gamma {
        #[arg(long, allow_negative_numbers = true)]
        power: f32,
    },
    Color {
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        saturation: f32,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        contrast: f32,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        brightness: f32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FalloffArg {
    Rising,
    Falling,
}

impl From<FalloffArg> for FalloffDirection {
    fn from(value: FalloffArg) -> Self {
        match value {
            FalloffArg::Rising => Self::Rising,
            FalloffArg::Falling => Self::Falling,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SplitArg {
    Axis,
    Radial,
}

impl From<SplitArg> for ChannelSplit {
    fn from(value: SplitArg) -> Self {
        match value {
            SplitArg::Axis => Self::Axis,
            SplitArg::Radial => Self::Radial,
        }
    }
}

impl EffectCommand {
    fn to_stage(&self) -> EffectStage {
        match *self {
            Self::Refraction {
                intensity,
                depth_effect,
                falloff,
            } => EffectStage::Refraction(RefractionParams {
                intensity,
                depth_effect,
                falloff: falloff.into(),
            }),
            Self::Dispersion {
                intensity,
                split,
                falloff,
            } => EffectStage::Dispersion(DispersionParams {
                intensity,
                split: split.into(),
                falloff: falloff.into(),
            }),
            Self::Gamma { power } => EffectStage::Gamma { power },
            Self::Color {
                saturation,
                contrast,
                brightness,
            } => EffectStage::Color(ColorParams {
                saturation,
                contrast,
                brightness,
            }),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Apply {
            input,
            stack,
            output,
        } => run_apply(input, stack, output, cli.json),
        Commands::Check { stack } => run_check(stack, cli.json),
        Commands::Effect {
            input,
            output,
            effect,
        } => run_stack(
            input,
            output,
            &EffectStack::new(vec![effect.to_stage()]),
            cli.json,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if cli.json {
                match serde_json::to_string_pretty(&envelope_for(&error)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("error: {error:#}"),
                }
            } else {
                eprintln!("error: {error:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("GLASSFX_LOG", default_filter))
        .format_timestamp(None)
        .init();
}

fn run_check(stack_path: &Path, json_output: bool) -> Result<()> {
    let loaded = load_and_validate_stack(stack_path)?;
    let names = loaded.stack.stage_names();

    if json_output {
        let report = json!({
            "ok": true,
            "stack": stack_path.display().to_string(),
            "stages": names,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "OK: {} ({} stages: {})",
            stack_path.display(),
            names.len(),
            names.join(", ")
        );
    }
    Ok(())
}

fn run_apply(input: &Path, stack_path: &Path, output: &Path, json_output: bool) -> Result<()> {
    let loaded = load_and_validate_stack(stack_path)?;
    run_stack(input, output, &loaded.stack, json_output)
}

fn run_stack(input: &Path, output: &Path, stack: &EffectStack, json_output: bool) -> Result<()> {
    // Reject bad parameters before decoding anything.
    stack.validate().map_err(coded_stack_error)?;

    let source = load_surface(input)?;
    let started = Instant::now();
    let result = stack.apply(&source).map_err(coded_stack_error)?;
    log::info!(
        "applied {} stage(s) to {}x{} in {:.1?}",
        stack.stages().len(),
        result.width(),
        result.height(),
        started.elapsed()
    );
    save_surface(&result, output)?;

    if json_output {
        let report = json!({
            "ok": true,
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "width": result.width(),
            "height": result.height(),
            "stages": stack.stage_names(),
            "sha256": result.sha256_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wrote {}", output.display());
    }
    Ok(())
}

fn coded_stack_error(error: StackError) -> CodedError {
    CodedError::usage(INVALID_PARAMETER, error.to_string()).with_details(json!({
        "stage_index": error.index,
        "stage": error.stage,
    }))
}
