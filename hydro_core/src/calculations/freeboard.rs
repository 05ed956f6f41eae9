//! # Freeboard
//!
//! Minimum wall height above the flume invert. Two requirements apply and
//! the larger governs:
//!
//! - Design flow: `H_s = h_s + h_s/12 + 0.05` for rectangular and
//!   trapezoidal barrels, `H_s = h_s + d/10` for a U-shell of internal
//!   diameter `d = 2r`
//! - Checked flow: `H_j = h_j + t + 0.1`, where `t` is the strut (tie-rod) height
//!
//! Both depths are normal depths in the flume at the respective discharge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::normal_depth::solve_normal_depth;
use crate::channel::{ChannelSection, SectionShape};
use crate::errors::{require_non_negative, require_positive, CalcResult};
use crate::project::DesignSettings;

/// Fixed allowance added at design flow for rectangular/trapezoidal barrels (m)
pub const DESIGN_ALLOWANCE: f64 = 0.05;

/// Fixed allowance added above the strut at checked flow (m)
pub const CHECKED_ALLOWANCE: f64 = 0.1;

/// Input for the freeboard calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeboardInput {
    /// Flume barrel section (final dimensions)
    pub section: ChannelSection,
    /// Design discharge Q_s (m³/s)
    pub design_discharge: f64,
    /// Checked discharge Q_j (m³/s)
    pub checked_discharge: f64,
    /// Strut / tie-rod height t (m)
    pub strut_height: f64,
}

impl FreeboardInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.section.validate("section")?;
        require_positive("design_discharge", self.design_discharge)?;
        require_positive("checked_discharge", self.checked_discharge)?;
        require_non_negative("strut_height", self.strut_height)
    }
}

/// Which of the two clearance requirements sets the wall height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoverningFlow {
    Design,
    Checked,
}

/// Freeboard result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeboardResult {
    /// Normal depth at design discharge h_s (m)
    pub design_depth: f64,
    /// Normal depth at checked discharge h_j (m)
    pub checked_depth: f64,
    /// Strut height t (m)
    pub strut_height: f64,
    /// Design-flow requirement H_s (m)
    pub design_requirement: f64,
    /// Checked-flow requirement H_j (m)
    pub checked_requirement: f64,
    /// Minimum wall height H = max(H_s, H_j) (m)
    pub required_height: f64,
    /// Requirement that governs
    pub governing: GoverningFlow,
}

impl FreeboardResult {
    /// Clearance above the design water surface (m)
    pub fn design_freeboard(&self) -> f64 {
        self.required_height - self.design_depth
    }
}

/// Design-flow clearance requirement H_s for a given shape.
pub fn design_requirement(shape: &SectionShape, design_depth: f64) -> f64 {
    match *shape {
        SectionShape::UShell { r } => design_depth + 2.0 * r / 10.0,
        SectionShape::Rectangular { .. } | SectionShape::Trapezoidal { .. } => {
            design_depth + design_depth / 12.0 + DESIGN_ALLOWANCE
        }
    }
}

/// Checked-flow clearance requirement H_j.
pub fn checked_requirement(checked_depth: f64, strut_height: f64) -> f64 {
    checked_depth + strut_height + CHECKED_ALLOWANCE
}

/// Solve both flume depths and apply the clearance rules.
pub fn calculate(input: &FreeboardInput, settings: &DesignSettings) -> CalcResult<FreeboardResult> {
    input.validate()?;

    let design_depth = solve_normal_depth(&input.section, input.design_discharge, settings)?.depth();
    let checked_depth = solve_normal_depth(&input.section, input.checked_discharge, settings)?.depth();

    let hs = design_requirement(&input.section.shape, design_depth);
    let hj = checked_requirement(checked_depth, input.strut_height);
    let (required_height, governing) = if hj > hs {
        (hj, GoverningFlow::Checked)
    } else {
        (hs, GoverningFlow::Design)
    };

    debug!(design_depth, checked_depth, required_height, ?governing, "freeboard");

    Ok(FreeboardResult {
        design_depth,
        checked_depth,
        strut_height: input.strut_height,
        design_requirement: hs,
        checked_requirement: hj,
        required_height,
        governing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Slope;

    fn ushell_input() -> FreeboardInput {
        FreeboardInput {
            section: ChannelSection::new(SectionShape::UShell { r: 2.0 }, 0.014, Slope::one_in(2000.0)),
            design_discharge: 20.0,
            checked_discharge: 24.0,
            strut_height: 0.2,
        }
    }

    #[test]
    fn test_ushell_freeboard() {
        let result = calculate(&ushell_input(), &DesignSettings::default()).unwrap();
        assert!((result.design_depth - 3.1109).abs() < 0.001);
        assert!((result.checked_depth - 3.5376).abs() < 0.001);
        // H_s = h_s + 4.0/10
        assert!((result.design_requirement - (result.design_depth + 0.4)).abs() < 1e-12);
        assert!((result.required_height - 3.8376).abs() < 0.001);
        assert_eq!(result.governing, GoverningFlow::Checked);
    }

    #[test]
    fn test_rectangular_rule() {
        let shape = SectionShape::Rectangular { b: 4.0 };
        assert!((design_requirement(&shape, 2.4) - (2.4 + 0.2 + 0.05)).abs() < 1e-12);
        assert!((checked_requirement(2.6, 0.0) - 2.7).abs() < 1e-12);
    }

    #[test]
    fn test_design_governs_without_strut_margin() {
        let input = FreeboardInput {
            checked_discharge: 20.5,
            strut_height: 0.0,
            ..ushell_input()
        };
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        assert_eq!(result.governing, GoverningFlow::Design);
        assert!((result.design_freeboard() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_negative_strut() {
        let input = FreeboardInput {
            strut_height: -0.1,
            ..ushell_input()
        };
        assert!(calculate(&input, &DesignSettings::default()).is_err());
    }
}
