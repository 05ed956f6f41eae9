//! # Channel Cross-Sections
//!
//! [`SectionShape`] is a closed set of the three geometries an aqueduct run
//! deals with: rectangular and U-shell flume barrels, and rectangular or
//! trapezoidal canals on either side. [`ChannelSection`] adds Manning
//! roughness and bed slope, which is everything a depth solver needs.
//!
//! Derived quantities never live on the section. [`ChannelSection::state_at`]
//! evaluates a [`HydraulicState`] snapshot for a given discharge and depth;
//! solvers hand those snapshots back to the caller.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "shape": { "type": "Trapezoidal", "b": 5.5, "m": 0.5 },
//!   "roughness": 0.015,
//!   "slope": { "numerator": 1.0, "denominator": 9000.0 }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::channel::{ChannelSection, SectionShape};
//! use hydro_core::project::HydraulicConstants;
//! use hydro_core::units::Slope;
//!
//! let flume = ChannelSection::new(SectionShape::UShell { r: 2.3 }, 0.014, Slope::one_in(2000.0));
//! let state = flume.state_at(24.0, 3.1445, &HydraulicConstants::default());
//! assert!((state.area - 12.1942).abs() < 0.001);
//! assert!((flume.manning_discharge(3.1445) - 24.0).abs() < 0.001);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::equations::hydraulics;
use crate::equations::section as geom;
use crate::errors::{require_non_negative, require_positive, CalcResult};
use crate::project::HydraulicConstants;
use crate::units::Slope;

/// Channel geometry families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SectionShape {
    /// Rectangular channel of bottom width `b` (m)
    Rectangular { b: f64 },
    /// Trapezoidal channel of bottom width `b` (m) and side slope `m` (H:V)
    Trapezoidal { b: f64, m: f64 },
    /// Semicircular invert of radius `r` (m) with vertical walls above
    UShell { r: f64 },
}

/// Shape family without dimensions, used when a dimension is the unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangular,
    Trapezoidal,
    UShell,
}

impl ShapeKind {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangular => "Rectangular",
            ShapeKind::Trapezoidal => "Trapezoidal",
            ShapeKind::UShell => "U-shell",
        }
    }

    /// Symbol of the characteristic dimension (`b` or `r`)
    pub fn dimension_symbol(&self) -> &'static str {
        match self {
            ShapeKind::UShell => "r",
            ShapeKind::Rectangular | ShapeKind::Trapezoidal => "b",
        }
    }
}

impl SectionShape {
    /// Shape family
    pub fn kind(&self) -> ShapeKind {
        match self {
            SectionShape::Rectangular { .. } => ShapeKind::Rectangular,
            SectionShape::Trapezoidal { .. } => ShapeKind::Trapezoidal,
            SectionShape::UShell { .. } => ShapeKind::UShell,
        }
    }

    /// Characteristic dimension: bottom width `b` or radius `r`
    pub fn dimension(&self) -> f64 {
        match *self {
            SectionShape::Rectangular { b } | SectionShape::Trapezoidal { b, .. } => b,
            SectionShape::UShell { r } => r,
        }
    }

    /// Same family with a new characteristic dimension
    pub fn with_dimension(self, value: f64) -> Self {
        match self {
            SectionShape::Rectangular { .. } => SectionShape::Rectangular { b: value },
            SectionShape::Trapezoidal { m, .. } => SectionShape::Trapezoidal { b: value, m },
            SectionShape::UShell { .. } => SectionShape::UShell { r: value },
        }
    }

    /// Channel width used for depth/width ratios (`b`, or the diameter `2r`)
    pub fn design_width(&self) -> f64 {
        match *self {
            SectionShape::Rectangular { b } | SectionShape::Trapezoidal { b, .. } => b,
            SectionShape::UShell { r } => 2.0 * r,
        }
    }

    /// Wetted area A(h)
    pub fn area(&self, h: f64) -> f64 {
        match *self {
            SectionShape::Rectangular { b } => geom::rectangular_area(b, h),
            SectionShape::Trapezoidal { b, m } => geom::trapezoidal_area(b, m, h),
            SectionShape::UShell { r } => geom::ushell_area(r, h),
        }
    }

    /// Wetted perimeter P(h)
    pub fn wetted_perimeter(&self, h: f64) -> f64 {
        match *self {
            SectionShape::Rectangular { b } => geom::rectangular_wetted_perimeter(b, h),
            SectionShape::Trapezoidal { b, m } => geom::trapezoidal_wetted_perimeter(b, m, h),
            SectionShape::UShell { r } => geom::ushell_wetted_perimeter(r, h),
        }
    }

    /// Hydraulic radius R(h)
    pub fn hydraulic_radius(&self, h: f64) -> f64 {
        match *self {
            SectionShape::UShell { r } => geom::ushell_hydraulic_radius(r, h),
            _ => geom::hydraulic_radius(self.area(h), self.wetted_perimeter(h)),
        }
    }

    /// Water-surface width B(h)
    pub fn top_width(&self, h: f64) -> f64 {
        match *self {
            SectionShape::Rectangular { b } => b,
            SectionShape::Trapezoidal { b, m } => geom::trapezoidal_top_width(b, m, h),
            SectionShape::UShell { r } => geom::ushell_top_width(r, h),
        }
    }

    /// Geometry parameters must be finite and positive (side slope may be zero).
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        match *self {
            SectionShape::Rectangular { b } => require_positive(&format!("{field}.b"), b),
            SectionShape::Trapezoidal { b, m } => {
                require_positive(&format!("{field}.b"), b)?;
                require_non_negative(&format!("{field}.m"), m)
            }
            SectionShape::UShell { r } => require_positive(&format!("{field}.r"), r),
        }
    }
}

impl fmt::Display for SectionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionShape::Rectangular { b } => write!(f, "Rectangular b = {b:.3} m"),
            SectionShape::Trapezoidal { b, m } => write!(f, "Trapezoidal b = {b:.3} m, m = {m}"),
            SectionShape::UShell { r } => write!(f, "U-shell r = {r:.3} m"),
        }
    }
}

/// Channel cross-section with the parameters Manning's equation needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSection {
    /// Geometry
    pub shape: SectionShape,
    /// Manning roughness coefficient n
    pub roughness: f64,
    /// Longitudinal bed slope i
    pub slope: Slope,
}

impl ChannelSection {
    pub fn new(shape: SectionShape, roughness: f64, slope: Slope) -> Self {
        ChannelSection {
            shape,
            roughness,
            slope,
        }
    }

    /// Same roughness and slope, different characteristic dimension
    pub fn with_dimension(&self, value: f64) -> Self {
        ChannelSection {
            shape: self.shape.with_dimension(value),
            ..*self
        }
    }

    /// Validate geometry, roughness and slope.
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        self.shape.validate(field)?;
        require_positive(&format!("{field}.roughness"), self.roughness)?;
        self.slope.validate(&format!("{field}.slope"))
    }

    /// Uniform-flow discharge carried at depth `h`
    pub fn manning_discharge(&self, h: f64) -> f64 {
        hydraulics::manning_discharge(
            self.shape.area(h),
            self.shape.hydraulic_radius(h),
            self.roughness,
            self.slope.value(),
        )
    }

    /// Evaluate every derived quantity at discharge `q` and depth `h`.
    pub fn state_at(&self, q: f64, h: f64, constants: &HydraulicConstants) -> HydraulicState {
        let area = self.shape.area(h);
        let top_width = self.shape.top_width(h);
        HydraulicState {
            discharge: q,
            depth: h,
            area,
            wetted_perimeter: self.shape.wetted_perimeter(h),
            hydraulic_radius: self.shape.hydraulic_radius(h),
            top_width,
            velocity: hydraulics::mean_velocity(q, area),
            froude: hydraulics::froude_number(q, area, top_width, constants.gravity),
        }
    }
}

/// Snapshot of the derived hydraulic quantities at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicState {
    /// Discharge Q (m³/s)
    pub discharge: f64,
    /// Depth h (m)
    pub depth: f64,
    /// Wetted area A (m²)
    pub area: f64,
    /// Wetted perimeter P (m)
    pub wetted_perimeter: f64,
    /// Hydraulic radius R (m)
    pub hydraulic_radius: f64,
    /// Water-surface width B (m)
    pub top_width: f64,
    /// Mean velocity v (m/s)
    pub velocity: f64,
    /// Froude criterion Q²B/(gA³)
    pub froude: f64,
}

impl HydraulicState {
    /// Flow regime from the Froude criterion
    pub fn regime(&self) -> FlowRegime {
        FlowRegime::classify(self.froude)
    }
}

/// Flow regime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowRegime {
    Subcritical,
    Critical,
    Supercritical,
}

impl FlowRegime {
    /// Band around Fr = 1 treated as critical
    pub const CRITICAL_BAND: f64 = 1e-3;

    pub fn classify(froude: f64) -> Self {
        if (froude - 1.0).abs() <= Self::CRITICAL_BAND {
            FlowRegime::Critical
        } else if froude < 1.0 {
            FlowRegime::Subcritical
        } else {
            FlowRegime::Supercritical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> HydraulicConstants {
        HydraulicConstants::default()
    }

    #[test]
    fn test_ushell_scenario() {
        let s = ChannelSection::new(SectionShape::UShell { r: 2.3 }, 0.014, Slope::one_in(2000.0));
        let state = s.state_at(24.0, 3.1445, &constants());
        assert!((state.area - 12.1942).abs() < 0.001);
        assert!((state.hydraulic_radius - 1.3679).abs() < 0.001);
        assert!((s.manning_discharge(3.1445) - 24.0).abs() < 0.001);
        assert!((state.velocity - 24.0 / 12.1942).abs() < 0.001);
    }

    #[test]
    fn test_rectangular_scenario() {
        let s = ChannelSection::new(SectionShape::Rectangular { b: 4.5 }, 0.014, Slope::from_value(0.0005));
        let state = s.state_at(24.0, 2.8627, &constants());
        assert!((state.area - 12.882).abs() < 0.001);
        assert!((state.hydraulic_radius - 1.26).abs() < 0.001);
        assert!((s.manning_discharge(2.8627) - 24.0).abs() < 0.001);
    }

    #[test]
    fn test_trapezoidal_scenario() {
        let s = ChannelSection::new(SectionShape::Trapezoidal { b: 5.5, m: 0.5 }, 0.015, Slope::one_in(9000.0));
        let state = s.state_at(24.0, 3.2338, &constants());
        assert!((state.area - 23.014).abs() < 0.001);
        assert!((state.hydraulic_radius - 1.808).abs() < 0.001);
        assert!((s.manning_discharge(3.2338) - 24.0).abs() < 0.001);
    }

    #[test]
    fn test_area_and_radius_monotone() {
        let shapes = [
            SectionShape::Rectangular { b: 4.5 },
            SectionShape::Trapezoidal { b: 5.5, m: 0.5 },
            SectionShape::UShell { r: 2.3 },
        ];
        for shape in shapes {
            let mut prev_a = 0.0;
            let mut prev_r = 0.0;
            for k in 1..1000 {
                let h = k as f64 * 0.01;
                let a = shape.area(h);
                let r = shape.hydraulic_radius(h);
                assert!(a >= prev_a, "{shape}: A decreased at h = {h}");
                assert!(r >= prev_r - 1e-12, "{shape}: R decreased at h = {h}");
                prev_a = a;
                prev_r = r;
            }
        }
    }

    #[test]
    fn test_with_dimension_keeps_side_slope() {
        let s = SectionShape::Trapezoidal { b: 5.5, m: 0.5 }.with_dimension(3.0);
        assert_eq!(s, SectionShape::Trapezoidal { b: 3.0, m: 0.5 });
        assert_eq!(SectionShape::UShell { r: 2.0 }.design_width(), 4.0);
    }

    #[test]
    fn test_validation() {
        assert!(SectionShape::Rectangular { b: -1.0 }.validate("flume").is_err());
        assert!(SectionShape::Trapezoidal { b: 5.0, m: 0.0 }.validate("canal").is_ok());
        let s = ChannelSection::new(SectionShape::UShell { r: 2.0 }, 0.0, Slope::one_in(2000.0));
        assert!(s.validate("flume").is_err());
    }

    #[test]
    fn test_regime() {
        assert_eq!(FlowRegime::classify(0.3), FlowRegime::Subcritical);
        assert_eq!(FlowRegime::classify(1.0005), FlowRegime::Critical);
        assert_eq!(FlowRegime::classify(2.0), FlowRegime::Supercritical);
    }

    #[test]
    fn test_shape_serialization() {
        let shape = SectionShape::Trapezoidal { b: 5.5, m: 0.5 };
        let json = serde_json::to_string(&shape).unwrap();
        assert_eq!(json, r#"{"type":"Trapezoidal","b":5.5,"m":0.5}"#);
        let roundtrip: SectionShape = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, roundtrip);
    }
}
