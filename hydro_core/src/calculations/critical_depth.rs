//! # Critical Depth
//!
//! Depth at which the Froude criterion `Q²B/(gA³)` equals one, i.e. the depth
//! of minimum specific energy for the discharge. The backwater solver uses it
//! to bound its search to the subcritical branch.
//!
//! Roughness and slope play no part; only the shape matters.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::critical_depth::solve_critical_depth;
//! use hydro_core::channel::SectionShape;
//! use hydro_core::project::DesignSettings;
//!
//! let hc = solve_critical_depth(&SectionShape::Rectangular { b: 5.0 }, 50.0, &DesignSettings::default()).unwrap();
//! assert!((hc.depth - 2.168).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channel::SectionShape;
use crate::equations::hydraulics::froude_number;
use crate::errors::{require_positive, CalcResult};
use crate::project::DesignSettings;
use crate::solver::bisect;

/// Critical depth solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalDepth {
    /// Critical depth h_k (m)
    pub depth: f64,
    /// Froude criterion at the solved depth (≈ 1)
    pub froude: f64,
    /// Bisection iterations used
    pub iterations: usize,
}

/// Solve for the critical depth of `shape` at discharge `q`.
pub fn solve_critical_depth(shape: &SectionShape, q: f64, settings: &DesignSettings) -> CalcResult<CriticalDepth> {
    require_positive("discharge", q)?;
    shape.validate("shape")?;
    let g = settings.constants.gravity;

    let froude_at = |h: f64| froude_number(q, shape.area(h), shape.top_width(h), g);
    let root = bisect(|h| 1.0 - froude_at(h), settings.depth_bracket, &settings.bisection)?;

    debug!(shape = %shape, discharge = q, depth = root.root, "critical depth solved");

    Ok(CriticalDepth {
        depth: root.root,
        froude: froude_at(root.root),
        iterations: root.iterations,
    })
}
