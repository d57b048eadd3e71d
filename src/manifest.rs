use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::error_codes::{CodedError, INVALID_STACK};
use crate::schema::StackManifest;
use crate::stack::EffectStack;

/// A validated manifest together with the runtime stack built from it.
#[derive(Debug, Clone)]
pub struct LoadedStack {
    pub manifest: StackManifest,
    pub stack: EffectStack,
}

pub fn load_and_validate_stack(path: &Path) -> Result<LoadedStack> {
    let contents = fs::read_to_string(path)
        .map_err(|error| CodedError::io(format!("{error}")))
        .with_context(|| format!("failed to read stack manifest {}", path.display()))?;
    parse_and_validate_stack(&contents, &path.display().to_string())
}

/// Parse and validate manifest text. `origin` names the source in errors.
pub fn parse_and_validate_stack(contents: &str, origin: &str) -> Result<LoadedStack> {
    let manifest: StackManifest = serde_yaml::from_str(contents).map_err(|error| {
        let location = error.location();
        let position = location
            .as_ref()
            .map(|location| format!("line {}, column {}", location.line(), location.column()))
            .unwrap_or_else(|| "unknown location".to_owned());
        let coded = CodedError::usage(
            INVALID_STACK,
            format!("failed to parse yaml in {origin} at {position}: {error}"),
        );
        match location {
            Some(location) => coded.with_details(json!({
                "file": origin,
                "line": location.line(),
                "column": location.column(),
            })),
            None => coded,
        }
    })?;

    manifest.validate().map_err(|error| {
        CodedError::usage(INVALID_STACK, format!("{origin}: {error:#}"))
            .with_details(json!({ "file": origin }))
    })?;

    let stack = manifest.to_stack();
    log::debug!(
        "loaded stack manifest {origin}: [{}]",
        stack.stage_names().join(", ")
    );
    Ok(LoadedStack { manifest, stack })
}
