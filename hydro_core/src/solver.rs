//! # Bisection Root Finder
//!
//! Every depth and width search in the crate goes through [`bisect`]. The
//! residual is evaluated at both bracket ends first; if they share a sign
//! there is no root to find and [`CalcError::BracketError`] is returned. The
//! loop then halves the bracket toward the sign change until
//! `|f(mid)| <= tolerance`, failing with [`CalcError::ConvergenceError`] once
//! the iteration cap is passed.
//!
//! Convergence is judged on the residual, not on the bracket width, so the
//! tolerance is in the residual's own units (m³/s for a Manning residual,
//! metres of head for an energy balance).
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::solver::{bisect, BisectionOptions, Bracket};
//!
//! let root = bisect(|x| x * x - 2.0, Bracket::new(0.0, 2.0), &BisectionOptions::default()).unwrap();
//! assert!((root.root - 2.0_f64.sqrt()).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{CalcError, CalcResult};

/// Default residual tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// Search interval `[left, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub left: f64,
    pub right: f64,
}

impl Bracket {
    pub fn new(left: f64, right: f64) -> Self {
        Bracket { left, right }
    }

    /// Same right end, new left end
    pub fn with_left(self, left: f64) -> Self {
        Bracket { left, ..self }
    }
}

impl Default for Bracket {
    /// Depth search interval in metres
    fn default() -> Self {
        Bracket::new(0.1, 10.0)
    }
}

/// Tolerance and iteration cap for [`bisect`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectionOptions {
    /// Stop once |f(x)| is at or below this value
    pub tolerance: f64,
    /// Fail once more than this many halvings were needed
    pub max_iterations: usize,
}

impl Default for BisectionOptions {
    fn default() -> Self {
        BisectionOptions {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Converged root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootResult {
    /// The root found
    pub root: f64,
    /// Residual at the root
    pub residual: f64,
    /// Number of bracket halvings performed
    pub iterations: usize,
}

/// Find `x` in `bracket` with `|f(x)| <= options.tolerance`.
///
/// # Errors
///
/// * [`CalcError::BracketError`] - `f(left)` and `f(right)` share a sign
/// * [`CalcError::ConvergenceError`] - more than `max_iterations` halvings needed
/// * [`CalcError::InvalidInput`] - the bracket is empty or the residual is not finite
pub fn bisect<F>(mut f: F, bracket: Bracket, options: &BisectionOptions) -> CalcResult<RootResult>
where
    F: FnMut(f64) -> f64,
{
    let Bracket { mut left, mut right } = bracket;
    if !(left.is_finite() && right.is_finite()) || left >= right {
        return Err(CalcError::invalid_input(
            "bracket",
            format!("[{left}, {right}]"),
            "Bracket must be finite with left < right",
        ));
    }

    let mut f_left = f(left);
    let f_right = f(right);
    if !(f_left.is_finite() && f_right.is_finite()) {
        return Err(CalcError::invalid_input(
            "residual",
            format!("f({left}) = {f_left}, f({right}) = {f_right}"),
            "Residual is not finite at the bracket ends",
        ));
    }
    if f_left.abs() <= options.tolerance {
        return Ok(RootResult {
            root: left,
            residual: f_left,
            iterations: 0,
        });
    }
    if f_right.abs() <= options.tolerance {
        return Ok(RootResult {
            root: right,
            residual: f_right,
            iterations: 0,
        });
    }
    if f_left * f_right > 0.0 {
        return Err(CalcError::bracket(left, right, f_left, f_right));
    }

    let mut iterations = 0;
    let mut mid = 0.5 * (left + right);
    let mut f_mid = f(mid);

    while f_mid.abs() > options.tolerance {
        if iterations >= options.max_iterations {
            return Err(CalcError::convergence(iterations, mid, f_mid));
        }
        iterations += 1;

        if f_mid * f_left > 0.0 {
            left = mid;
            f_left = f_mid;
        } else {
            right = mid;
        }
        mid = 0.5 * (left + right);
        f_mid = f(mid);
        trace!(iteration = iterations, x = mid, residual = f_mid, "bisection step");
    }

    Ok(RootResult {
        root: mid,
        residual: f_mid,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_square_root() {
        let result = bisect(|x| x * x - 2.0, Bracket::new(0.0, 2.0), &BisectionOptions::default()).unwrap();
        assert!(result.residual.abs() <= DEFAULT_TOLERANCE);
        assert!((result.root - 1.41421).abs() < 1e-4);
    }

    #[test]
    fn test_decreasing_residual() {
        // Same sign logic must work when f falls across the bracket
        let result = bisect(|x| 3.0 - x, Bracket::default(), &BisectionOptions::default()).unwrap();
        assert!((result.root - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_sign_change_is_bracket_error() {
        let err = bisect(|x| x + 1.0, Bracket::new(0.1, 10.0), &BisectionOptions::default()).unwrap_err();
        match err {
            CalcError::BracketError { left, right, f_left, f_right } => {
                assert_eq!(left, 0.1);
                assert_eq!(right, 10.0);
                assert!(f_left > 0.0 && f_right > 0.0);
            }
            other => panic!("expected BracketError, got {other:?}"),
        }
    }

    #[test]
    fn test_iteration_cap_is_convergence_error() {
        let options = BisectionOptions {
            tolerance: 1e-12,
            max_iterations: 5,
        };
        let err = bisect(|x| x - 1.234567, Bracket::new(0.0, 10.0), &options).unwrap_err();
        assert!(matches!(err, CalcError::ConvergenceError { iterations: 5, .. }));
    }

    #[test]
    fn test_step_residual_never_converges() {
        // Discontinuous residual: sign change without a root
        let step = |x: f64| if x < 1.0 { -1.0 } else { 1.0 };
        let err = bisect(step, Bracket::new(0.0, 3.0), &BisectionOptions::default()).unwrap_err();
        assert!(err.is_solver_failure());
    }

    #[test]
    fn test_empty_bracket_rejected() {
        let err = bisect(|x| x, Bracket::new(2.0, 1.0), &BisectionOptions::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_root_at_midpoint_needs_no_iterations() {
        let result = bisect(|x| x - 5.05, Bracket::new(0.1, 10.0), &BisectionOptions::default()).unwrap();
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_root_at_left_end() {
        // Steep residual: halving toward the end never gets within tolerance
        let result = bisect(|x| 1000.0 * (x - 0.1), Bracket::new(0.1, 10.0), &BisectionOptions::default()).unwrap();
        assert_eq!(result.root, 0.1);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_root_at_right_end() {
        let result = bisect(|x| 1000.0 * (x - 10.0), Bracket::new(0.1, 10.0), &BisectionOptions::default()).unwrap();
        assert_eq!(result.root, 10.0);
        assert_eq!(result.iterations, 0);
    }
}
