//! Validation of run parameters and input paths.

use crate::errors::{PairecError, Result};
use std::path::Path;

/// Checks that a file exists, labeling the error with `description`
/// (e.g. "Input BAM").
///
/// # Errors
///
/// Returns [`PairecError::InvalidFileFormat`] when the path is absent.
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    Err(PairecError::InvalidFileFormat {
        file_type: description.to_string(),
        path: path.display().to_string(),
        reason: "file does not exist".to_string(),
    })
}

/// Validate that a percent-identity threshold lies in `[0, 100]`.
///
/// # Errors
/// Returns an error when the value is NaN or outside the closed range.
pub fn validate_percent_identity(value: f64, parameter: &str) -> Result<()> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(PairecError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: format!("must be a percentage between 0 and 100, got {value}"),
        });
    }
    Ok(())
}
