//! # Water-Surface Rise Check
//!
//! At checked discharge the backwater profile raises the water level in the
//! upstream canal. The rise is acceptable while the computed depth `h0`
//! stays within `rise_limit` (1.03 by default) times the canal's own normal
//! depth at that discharge.
//!
//! A failing check is a design outcome to report, never an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Result of the rise check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiseCheck {
    /// Depth from the backwater profile h0 (m)
    pub computed_depth: f64,
    /// Normal depth at the same discharge h (m)
    pub normal_depth: f64,
    /// Allowed ratio h0/h
    pub limit_ratio: f64,
    /// Allowed depth limit_ratio·h (m)
    pub allowed: f64,
    /// True when h0 ≤ allowed
    pub passes: bool,
}

impl RiseCheck {
    /// Compare `computed_depth` against `limit_ratio · normal_depth`.
    pub fn evaluate(computed_depth: f64, normal_depth: f64, limit_ratio: f64) -> Self {
        let allowed = limit_ratio * normal_depth;
        let passes = computed_depth <= allowed;
        if !passes {
            warn!(computed_depth, allowed, "water-surface rise exceeds the allowed limit");
        }
        RiseCheck {
            computed_depth,
            normal_depth,
            limit_ratio,
            allowed,
            passes,
        }
    }

    /// Actual ratio h0/h
    pub fn ratio(&self) -> f64 {
        if self.normal_depth > 0.0 {
            self.computed_depth / self.normal_depth
        } else {
            f64::INFINITY
        }
    }

    /// Water-surface rise above normal depth (m)
    pub fn rise(&self) -> f64 {
        self.computed_depth - self.normal_depth
    }
}
