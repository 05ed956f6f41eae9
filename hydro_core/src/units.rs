//! # Unit Types
//!
//! Hydraulic design works in SI throughout:
//! - Length and depth: metres (m)
//! - Area: square metres (m²)
//! - Discharge: cubic metres per second (m³/s)
//! - Velocity: metres per second (m/s)
//!
//! Plain `f64` fields carry the numbers (field names say the unit where it is
//! not obvious). The one value type with structure is [`Slope`], which keeps
//! its fraction form so reports can print `1/2000` instead of `0.0005`.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::units::Slope;
//!
//! let i = Slope::one_in(2000.0);
//! assert!((i.value() - 0.0005).abs() < 1e-12);
//! assert_eq!(i.to_string(), "1/2000");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};

/// Unit labels used in report entries
pub const M: &str = "m";
pub const M3_S: &str = "m³/s";
pub const M_S: &str = "m/s";
pub const DIMENSIONLESS: &str = "-";

/// Longitudinal bed slope stored as a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slope {
    /// Vertical drop
    pub numerator: f64,
    /// Horizontal run
    pub denominator: f64,
}

impl Slope {
    /// Create a slope from numerator and denominator
    pub fn new(numerator: f64, denominator: f64) -> Self {
        Slope {
            numerator,
            denominator,
        }
    }

    /// Slope of 1 in `denominator` (e.g. `one_in(2000.0)` = 1/2000)
    pub fn one_in(denominator: f64) -> Self {
        Slope::new(1.0, denominator)
    }

    /// Create a slope from a decimal value (`0.0005` becomes `0.0005/1`)
    pub fn from_value(value: f64) -> Self {
        Slope::new(value, 1.0)
    }

    /// Dimensionless slope value i = numerator / denominator
    pub fn value(&self) -> f64 {
        self.numerator / self.denominator
    }

    /// Both parts must be finite and positive.
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        require_positive(&format!("{field}.numerator"), self.numerator)?;
        require_positive(&format!("{field}.denominator"), self.denominator)
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1.0 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}
