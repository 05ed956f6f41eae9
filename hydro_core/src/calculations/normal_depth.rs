//! # Normal Depth
//!
//! Depth at which Manning's equation carries the target discharge under
//! uniform flow. The residual `Q − Q_manning(h)` falls as `h` rises, and is
//! bisected over the depth bracket from [`DesignSettings`].
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::normal_depth::solve_normal_depth;
//! use hydro_core::channel::{ChannelSection, SectionShape};
//! use hydro_core::project::DesignSettings;
//! use hydro_core::units::Slope;
//!
//! let canal = ChannelSection::new(SectionShape::Trapezoidal { b: 5.5, m: 0.5 }, 0.015, Slope::one_in(9000.0));
//! let solution = solve_normal_depth(&canal, 24.0, &DesignSettings::default()).unwrap();
//! assert!((solution.state.depth - 3.234).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channel::{ChannelSection, HydraulicState};
use crate::errors::{require_positive, CalcResult};
use crate::project::DesignSettings;
use crate::solver::bisect;

/// A solved depth with its hydraulic elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthSolution {
    /// Hydraulic elements at the solved depth
    pub state: HydraulicState,
    /// Bisection iterations used
    pub iterations: usize,
}

impl DepthSolution {
    /// Solved depth (m)
    pub fn depth(&self) -> f64 {
        self.state.depth
    }
}

/// Solve for the normal depth of `section` at discharge `q`.
///
/// # Errors
///
/// * `InvalidInput` - non-positive discharge or invalid section
/// * `BracketError` - `q` is not reachable inside the depth bracket
/// * `ConvergenceError` - the iteration cap was exceeded
pub fn solve_normal_depth(section: &ChannelSection, q: f64, settings: &DesignSettings) -> CalcResult<DepthSolution> {
    require_positive("discharge", q)?;
    section.validate("section")?;

    let root = bisect(
        |h| q - section.manning_discharge(h),
        settings.depth_bracket,
        &settings.bisection,
    )?;

    debug!(
        shape = %section.shape,
        discharge = q,
        depth = root.root,
        iterations = root.iterations,
        "normal depth solved"
    );

    Ok(DepthSolution {
        state: section.state_at(q, root.root, &settings.constants),
        iterations: root.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::SectionShape;
    use crate::errors::CalcError;
    use crate::units::Slope;

    fn settings() -> DesignSettings {
        DesignSettings::default()
    }

    #[test]
    fn test_ushell_normal_depth() {
        let s = ChannelSection::new(SectionShape::UShell { r: 2.3 }, 0.014, Slope::one_in(2000.0));
        let sol = solve_normal_depth(&s, 24.0, &settings()).unwrap();
        assert!((sol.depth() - 3.1445).abs() < 0.001);
        assert!((sol.state.area - 12.1942).abs() < 0.01);
    }

    #[test]
    fn test_rectangular_normal_depth() {
        let s = ChannelSection::new(SectionShape::Rectangular { b: 4.5 }, 0.014, Slope::from_value(0.0005));
        let sol = solve_normal_depth(&s, 24.0, &settings()).unwrap();
        assert!((sol.depth() - 2.863).abs() < 0.001);
    }

    #[test]
    fn test_trapezoidal_normal_depth() {
        let s = ChannelSection::new(SectionShape::Trapezoidal { b: 5.5, m: 0.5 }, 0.015, Slope::one_in(9000.0));
        let sol = solve_normal_depth(&s, 24.0, &settings()).unwrap();
        assert!((sol.depth() - 3.2338).abs() < 0.001);
    }

    #[test]
    fn test_round_trip_all_shapes() {
        let sections = [
            ChannelSection::new(SectionShape::Rectangular { b: 3.0 }, 0.014, Slope::one_in(1500.0)),
            ChannelSection::new(SectionShape::Trapezoidal { b: 4.0, m: 1.25 }, 0.017, Slope::one_in(15000.0)),
            ChannelSection::new(SectionShape::UShell { r: 1.8 }, 0.014, Slope::one_in(2000.0)),
        ];
        for section in sections {
            for q in [2.0, 8.0, 15.0] {
                let sol = solve_normal_depth(&section, q, &settings()).unwrap();
                let back = section.manning_discharge(sol.depth());
                assert!((back - q).abs() <= settings().bisection.tolerance, "{}: Q = {q}", section.shape);
            }
        }
    }

    #[test]
    fn test_state_is_subcritical_for_mild_canal() {
        let s = ChannelSection::new(SectionShape::Trapezoidal { b: 5.5, m: 0.5 }, 0.015, Slope::one_in(9000.0));
        let sol = solve_normal_depth(&s, 24.0, &settings()).unwrap();
        assert_eq!(sol.state.regime(), crate::channel::FlowRegime::Subcritical);
    }

    #[test]
    fn test_unreachable_discharge_is_bracket_error() {
        // 4.5 m rectangle at 10 m depth carries roughly 108 m³/s
        let s = ChannelSection::new(SectionShape::Rectangular { b: 4.5 }, 0.014, Slope::from_value(0.0005));
        let err = solve_normal_depth(&s, 200.0, &settings()).unwrap_err();
        assert!(matches!(err, CalcError::BracketError { .. }));
    }

    #[test]
    fn test_rejects_zero_discharge() {
        let s = ChannelSection::new(SectionShape::Rectangular { b: 4.5 }, 0.014, Slope::from_value(0.0005));
        assert_eq!(solve_normal_depth(&s, 0.0, &settings()).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
