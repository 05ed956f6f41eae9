//! # Error Types
//!
//! Structured error types for hydro_core. Every failure a design run can
//! produce is one of these variants, and each one serializes to JSON so a
//! front end can show the same context the engineer sees on the console.
//!
//! Two variants come straight from the root finder:
//!
//! - [`CalcError::BracketError`]: the search interval has no sign change,
//!   which means the requested discharge cannot be carried by the geometry
//!   anywhere inside the bracket.
//! - [`CalcError::ConvergenceError`]: the iteration cap was hit. This is
//!   fatal for the solve and is never retried.
//!
//! A failing rise check is **not** an error; it is reported as a normal
//! result (see [`crate::calculations::rise_check`]).
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(b_m: f64) -> CalcResult<()> {
//!     if b_m <= 0.0 {
//!         return Err(CalcError::invalid_input("b", b_m.to_string(), "Width must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hydro_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for hydraulic calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Bisection bracket endpoints share a sign
    #[error("No sign change on [{left}, {right}]: f(left) = {f_left:.6}, f(right) = {f_right:.6}")]
    BracketError {
        left: f64,
        right: f64,
        f_left: f64,
        f_right: f64,
    },

    /// Bisection hit its iteration cap
    #[error("Iteration limit exceeded after {iterations} iterations (x = {last_x:.6}, residual = {last_residual:.3e})")]
    ConvergenceError {
        iterations: usize,
        last_x: f64,
        last_residual: f64,
    },

    /// A named design step failed
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a BracketError from the bracket and its endpoint residuals
    pub fn bracket(left: f64, right: f64, f_left: f64, f_right: f64) -> Self {
        CalcError::BracketError {
            left,
            right,
            f_left,
            f_right,
        }
    }

    /// Create a ConvergenceError from the last bisection state
    pub fn convergence(iterations: usize, last_x: f64, last_residual: f64) -> Self {
        CalcError::ConvergenceError {
            iterations,
            last_x,
            last_residual,
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// Wrap an error with the name of the design step that produced it.
    ///
    /// Validation errors pass through untouched so the offending field
    /// stays visible to the caller.
    pub fn in_step(self, step: &str) -> Self {
        match self {
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. } => self,
            other => CalcError::calculation_failed(step, other.to_string()),
        }
    }

    /// True for the two root-finder failures
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            CalcError::BracketError { .. } | CalcError::ConvergenceError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::BracketError { .. } => "BRACKET_ERROR",
            CalcError::ConvergenceError { .. } => "CONVERGENCE_ERROR",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a finite value greater than zero",
        ));
    }
    Ok(())
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a finite value of zero or more",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("b", "-4.5", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("flume").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::bracket(0.1, 10.0, 5.0, 2.0).error_code(), "BRACKET_ERROR");
        assert_eq!(CalcError::convergence(25, 1.0, 0.1).error_code(), "CONVERGENCE_ERROR");
        assert_eq!(CalcError::internal("no reaches").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_solver_failure_classification() {
        assert!(CalcError::bracket(0.1, 10.0, 1.0, 1.0).is_solver_failure());
        assert!(CalcError::convergence(25, 1.0, 0.1).is_solver_failure());
        assert!(!CalcError::missing_field("x").is_solver_failure());
    }

    #[test]
    fn test_in_step_wraps_solver_errors_only() {
        let wrapped = CalcError::bracket(0.1, 10.0, 1.0, 2.0).in_step("Freeboard");
        match wrapped {
            CalcError::CalculationFailed { calculation_type, reason } => {
                assert_eq!(calculation_type, "Freeboard");
                assert!(reason.contains("No sign change"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let invalid = CalcError::invalid_input("n", "0", "bad");
        assert_eq!(invalid.clone().in_step("Freeboard"), invalid);
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("r", 2.3).is_ok());
        assert!(require_positive("r", 0.0).is_err());
        assert!(require_positive("r", f64::NAN).is_err());
        assert!(require_non_negative("m", 0.0).is_ok());
        assert!(require_non_negative("m", -0.5).is_err());
    }
}
