use serde_json::Value;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::schema::{Payload, Shape, ValidationError, ValidationOptions};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Validates the JSON document in `path` against the shape called `shape_name`.
pub fn check_file(
    shape_name: &str,
    path: &Path,
    options: &ValidationOptions,
) -> Result<Payload, CheckError> {
    let shape = Shape::from_name(shape_name)
        .ok_or_else(|| CheckError::UnknownShape(shape_name.to_string()))?;

    debug!("Reading {} payload from {}", shape, path.display());
    let contents = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;

    let payload = shape.validate(&value, options)?;
    info!("{} is a valid {} payload", path.display(), shape);
    Ok(payload)
}

/// Runs the `check` command: the validated payload goes to `out`, the issues
/// of a payload that fails validation go to `err`.
///
/// Returns whether the payload was valid. An invalid payload is reported here
/// and only here; every other failure is returned to the caller.
pub fn run_check(
    shape_name: &str,
    path: &Path,
    options: &ValidationOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, CheckError> {
    match check_file(shape_name, path, options) {
        Ok(payload) => {
            serde_json::to_writer_pretty(&mut *out, &payload)?;
            writeln!(out)?;
            Ok(true)
        }
        Err(CheckError::Invalid(e)) => {
            writeln!(
                err,
                "{} is not a valid {} payload:\n{}",
                path.display(),
                shape_name,
                render_issues(&e)
            )?;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// One line per issue, for terminal output.
pub fn render_issues(error: &ValidationError) -> String {
    error
        .issues
        .iter()
        .map(|issue| format!("  {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}
