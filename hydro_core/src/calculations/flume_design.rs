//! # Aqueduct Flume Design
//!
//! Runs a complete hydraulic design of an aqueduct: barrel sizing, wall
//! height, floor levels, and the water-surface profiles at design and checked
//! discharge.
//!
//! ## Steps
//!
//! 1. Width window from the permissible depth/width ratio ([`width`](super::width))
//! 2. Flume dimension: the fixed value if given, otherwise the suggested one
//! 3. Wall height from design- and checked-flow depths ([`freeboard`](super::freeboard))
//! 4. Drawdown and floor elevations at design discharge ([`floor`](super::floor))
//! 5. Backwater profiles at both discharges ([`backwater`](super::backwater))
//! 6. Water-surface rise at the upstream canal ([`rise_check`](super::rise_check))
//!
//! A solver failure in any step comes back as
//! [`CalcError::CalculationFailed`] naming the step. A failing rise check or
//! an empty width window is reported in the result, not raised.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::flume_design::{calculate, FlumeDesignInput};
//! use hydro_core::project::DesignSettings;
//!
//! let result = calculate(&FlumeDesignInput::example(), &DesignSettings::default()).unwrap();
//! assert!((result.dimension - 2.0).abs() < 1e-9);
//! assert!(result.rise_check.passes);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::backwater::{ProfileLayout, TransitionSpec, WaterSurfaceProfile};
use crate::calculations::floor::{self, FloorInput, FloorResult};
use crate::calculations::freeboard::{self, FreeboardInput, FreeboardResult};
use crate::calculations::normal_depth::solve_normal_depth;
use crate::calculations::rise_check::RiseCheck;
use crate::calculations::width::{self, WidthInput, WidthResult};
use crate::channel::{ChannelSection, SectionShape, ShapeKind};
use crate::equations::Equation;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::project::DesignSettings;
use crate::report::ReportTrace;
use crate::units::{Slope, DIMENSIONLESS, M, M3_S, M_S};

/// Flume barrel definition. The dimension is solved unless fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlumeSpec {
    /// Shape family
    pub kind: ShapeKind,
    /// Side slope m, trapezoidal barrels only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_slope: Option<f64>,
    /// Manning roughness n
    pub roughness: f64,
    /// Bed slope i
    pub slope: Slope,
    /// Fixed bottom width `b` or radius `r` (m); solved when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<f64>,
}

impl FlumeSpec {
    /// Section with the given characteristic dimension
    pub fn section(&self, dimension: f64) -> ChannelSection {
        let shape = match self.kind {
            ShapeKind::Rectangular => SectionShape::Rectangular { b: dimension },
            ShapeKind::Trapezoidal => SectionShape::Trapezoidal {
                b: dimension,
                m: self.side_slope.unwrap_or(0.0),
            },
            ShapeKind::UShell => SectionShape::UShell { r: dimension },
        };
        ChannelSection::new(shape, self.roughness, self.slope)
    }
}

/// Input for a complete aqueduct design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlumeDesignInput {
    /// User label (e.g. "Aqueduct K3+250")
    pub label: String,
    /// Flume barrel
    pub flume: FlumeSpec,
    /// Canal upstream of the inlet transition
    pub upstream_canal: ChannelSection,
    /// Canal downstream of the outlet transition
    pub downstream_canal: ChannelSection,
    /// Design discharge Q_s (m³/s)
    pub design_discharge: f64,
    /// Checked (enlarged) discharge Q_j (m³/s)
    pub checked_discharge: f64,
    /// Strut / tie-rod height t (m)
    pub strut_height: f64,
    /// Inlet transition
    pub inlet: TransitionSpec,
    /// Outlet transition
    pub outlet: TransitionSpec,
    /// Flume length L (m)
    pub flume_length: f64,
    /// Upstream canal floor elevation N3 (m)
    pub upstream_floor: f64,
    /// Adopted wall height (m); the required height is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_height: Option<f64>,
}

impl FlumeDesignInput {
    /// U-shell aqueduct between two trapezoidal canals, used by the CLI demo
    /// and as the template project.
    pub fn example() -> Self {
        FlumeDesignInput {
            label: "Aqueduct 1".to_string(),
            flume: FlumeSpec {
                kind: ShapeKind::UShell,
                side_slope: None,
                roughness: 0.014,
                slope: Slope::one_in(2000.0),
                dimension: None,
            },
            upstream_canal: ChannelSection::new(
                SectionShape::Trapezoidal { b: 5.5, m: 0.5 },
                0.015,
                Slope::one_in(9000.0),
            ),
            downstream_canal: ChannelSection::new(
                SectionShape::Trapezoidal { b: 4.0, m: 1.25 },
                0.017,
                Slope::one_in(15000.0),
            ),
            design_discharge: 20.0,
            checked_discharge: 24.0,
            strut_height: 0.2,
            inlet: TransitionSpec {
                length: 15.0,
                roughness: 0.014,
                loss_coefficient: 0.3,
            },
            outlet: TransitionSpec {
                length: 15.0,
                roughness: 0.014,
                loss_coefficient: 0.5,
            },
            flume_length: 200.0,
            upstream_floor: 255.0,
            wall_height: None,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.width_input().validate()?;
        if let Some(d) = self.flume.dimension {
            require_positive("flume.dimension", d)?;
        }
        self.upstream_canal.validate("upstream_canal")?;
        self.downstream_canal.validate("downstream_canal")?;
        if self.checked_discharge < self.design_discharge {
            return Err(CalcError::invalid_input(
                "checked_discharge",
                self.checked_discharge.to_string(),
                "Checked discharge must not be less than the design discharge",
            ));
        }
        require_non_negative("strut_height", self.strut_height)?;
        self.inlet.validate("inlet")?;
        self.outlet.validate("outlet")?;
        require_positive("flume_length", self.flume_length)?;
        if !self.upstream_floor.is_finite() {
            return Err(CalcError::invalid_input(
                "upstream_floor",
                self.upstream_floor.to_string(),
                "Elevation must be finite",
            ));
        }
        if let Some(h) = self.wall_height {
            require_positive("wall_height", h)?;
        }
        Ok(())
    }

    fn width_input(&self) -> WidthInput {
        WidthInput {
            kind: self.flume.kind,
            side_slope: self.flume.side_slope,
            roughness: self.flume.roughness,
            slope: self.flume.slope,
            design_discharge: self.design_discharge,
            checked_discharge: self.checked_discharge,
        }
    }
}

/// Complete aqueduct design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlumeDesignResult {
    pub label: String,
    /// Width window from the depth/width ratio trials
    pub width: WidthResult,
    /// Adopted dimension `b` or `r` (m)
    pub dimension: f64,
    /// Flume barrel with the adopted dimension
    pub flume_section: ChannelSection,
    pub freeboard: FreeboardResult,
    /// Adopted wall height (m)
    pub wall_height: f64,
    /// Adopted wall height meets the requirement
    pub wall_height_adequate: bool,
    pub floor: FloorResult,
    /// Profile at design discharge
    pub design_profile: WaterSurfaceProfile,
    /// Profile at checked discharge
    pub checked_profile: WaterSurfaceProfile,
    pub rise_check: RiseCheck,
    /// Ordered computed quantities for document builders
    pub report: ReportTrace,
}

impl FlumeDesignResult {
    /// Adopted dimension within the width window
    pub fn dimension_in_window(&self) -> bool {
        self.width.contains(self.dimension)
    }

    /// Every check passes
    pub fn passes(&self) -> bool {
        self.dimension_in_window() && self.wall_height_adequate && self.rise_check.passes
    }
}

/// Run the full design.
pub fn calculate(input: &FlumeDesignInput, settings: &DesignSettings) -> CalcResult<FlumeDesignResult> {
    settings.validate()?;
    input.validate()?;
    let qs = input.design_discharge;
    let qj = input.checked_discharge;

    info!(label = %input.label, kind = input.flume.kind.display_name(), "sizing flume");
    let width = width::calculate(&input.width_input(), settings).map_err(|e| e.in_step("Width design"))?;

    let dimension = match input.flume.dimension {
        Some(d) => {
            if !width.contains(d) {
                warn!(
                    dimension = d,
                    lower = width.lower_bound,
                    upper = width.upper_bound,
                    "fixed flume dimension lies outside the width window"
                );
            }
            d
        }
        None => width.suggested,
    };
    let flume_section = input.flume.section(dimension);
    info!(dimension, "flume dimension adopted");

    let freeboard = freeboard::calculate(
        &FreeboardInput {
            section: flume_section,
            design_discharge: qs,
            checked_discharge: qj,
            strut_height: input.strut_height,
        },
        settings,
    )
    .map_err(|e| e.in_step("Freeboard"))?;
    let wall_height = input.wall_height.unwrap_or(freeboard.required_height);
    let wall_height_adequate = wall_height >= freeboard.required_height;
    if !wall_height_adequate {
        warn!(wall_height, required = freeboard.required_height, "wall height below requirement");
    }

    info!("computing floor elevations");
    let floor = floor::calculate(
        &FloorInput {
            upstream: input.upstream_canal,
            flume: flume_section,
            downstream: input.downstream_canal,
            inlet_length: input.inlet.length,
            flume_length: input.flume_length,
            outlet_length: input.outlet.length,
            inlet_roughness: input.inlet.roughness,
            outlet_roughness: input.outlet.roughness,
            inlet_loss: input.inlet.loss_coefficient,
            outlet_loss: input.outlet.loss_coefficient,
            upstream_floor: input.upstream_floor,
            discharge: qs,
        },
        settings,
    )
    .map_err(|e| e.in_step("Floor elevations"))?;

    let layout = ProfileLayout {
        upstream: input.upstream_canal,
        flume: flume_section,
        downstream: input.downstream_canal,
        inlet: input.inlet,
        outlet: input.outlet,
        flume_length: input.flume_length,
        elevations: floor.elevations,
    };

    info!(discharge = qs, "propagating design profile");
    let design_profile = WaterSurfaceProfile::propagate(&layout, qs, settings)
        .map_err(|e| e.in_step("Backwater profile at design discharge"))?;
    info!(discharge = qj, "propagating checked profile");
    let checked_profile = WaterSurfaceProfile::propagate(&layout, qj, settings)
        .map_err(|e| e.in_step("Backwater profile at checked discharge"))?;

    let upstream_normal = solve_normal_depth(&input.upstream_canal, qj, settings)
        .map_err(|e| e.in_step("Rise check"))?
        .depth();
    let rise_check = RiseCheck::evaluate(checked_profile.inlet_reach()?.upstream.depth, upstream_normal, settings.rise_limit);
    info!(
        computed = rise_check.computed_depth,
        allowed = rise_check.allowed,
        passes = rise_check.passes,
        "rise check"
    );

    let mut result = FlumeDesignResult {
        label: input.label.clone(),
        width,
        dimension,
        flume_section,
        freeboard,
        wall_height,
        wall_height_adequate,
        floor,
        design_profile,
        checked_profile,
        rise_check,
        report: ReportTrace::new(),
    };
    result.report = build_report(input, &result);
    Ok(result)
}

fn build_report(input: &FlumeDesignInput, r: &FlumeDesignResult) -> ReportTrace {
    let mut trace = ReportTrace::new();
    let sym = input.flume.kind.dimension_symbol();

    trace.push("Q_s", "given", input.design_discharge, M3_S, "Design discharge");
    trace.push("Q_j", "given", input.checked_discharge, M3_S, "Checked discharge");
    trace.push("N3", "given", input.upstream_floor, M, "Upstream canal floor");

    for t in &r.width.trials {
        let ctx = format!("Width trial, Q = {:.3}, β = {:.2}", t.discharge, t.ratio);
        trace.record(Equation::DepthWidthRatio, "h", t.depth, M, ctx.clone());
        trace.record(Equation::ManningDischarge, sym, t.dimension, M, ctx);
    }
    trace.push(sym, "adopted", r.dimension, M, "Flume");

    let fb = &r.freeboard;
    trace.record(Equation::ManningDischarge, "h_s", fb.design_depth, M, "Flume, design discharge");
    trace.record(Equation::ManningDischarge, "h_j", fb.checked_depth, M, "Flume, checked discharge");
    let design_rule = match input.flume.kind {
        ShapeKind::UShell => Equation::DesignFreeboardUShell,
        ShapeKind::Rectangular | ShapeKind::Trapezoidal => Equation::DesignFreeboardRectangular,
    };
    trace.record(design_rule, "H_s", fb.design_requirement, M, "Freeboard");
    trace.record(Equation::CheckedFreeboard, "H_j", fb.checked_requirement, M, "Freeboard");
    trace.record(Equation::CheckedFreeboard, "H", fb.required_height, M, "Freeboard");

    let fl = &r.floor;
    for (symbol, state, ctx) in [
        ("h1", &fl.upstream, "Upstream canal"),
        ("h", &fl.flume, "Flume"),
        ("h2", &fl.downstream, "Downstream canal"),
    ] {
        trace.record(Equation::ManningDischarge, symbol, state.depth, M, ctx);
        trace.record(Equation::MeanVelocity, "v", state.velocity, M_S, ctx);
    }
    trace.record(Equation::AverageFrictionSlope, "J12", fl.inlet_friction_slope, DIMENSIONLESS, "Inlet transition");
    trace.record(Equation::AverageFrictionSlope, "J34", fl.outlet_friction_slope, DIMENSIONLESS, "Outlet transition");
    trace.record(Equation::InletDrop, "Z1", fl.inlet_drop, M, "Inlet transition");
    trace.record(Equation::FlumeDrop, "Z2", fl.flume_drop, M, "Flume");
    trace.record(Equation::OutletRecovery, "Z3", fl.outlet_recovery, M, "Outlet transition");
    trace.record(Equation::TotalDrop, "ΔZ", fl.total_drop, M, "Structure");
    let e = fl.elevations;
    trace.record(Equation::FloorElevations, "N1", e.flume_inlet, M, "Flume inlet floor");
    trace.record(Equation::FloorElevations, "N2", e.flume_outlet, M, "Flume outlet floor");
    trace.record(Equation::FloorElevations, "N4", e.downstream_canal, M, "Downstream canal floor");

    for profile in [&r.design_profile, &r.checked_profile] {
        let q = profile.discharge;
        trace.record(
            Equation::ManningDischarge,
            "h",
            profile.boundary_depth,
            M,
            format!("Downstream canal, Q = {q:.3}"),
        );
        for reach in &profile.reaches {
            let ctx = format!("{}, Q = {q:.3}", reach.label);
            trace.record(Equation::CriticalDepth, "h_k", reach.critical_depth, M, ctx.clone());
            trace.record(Equation::AverageFrictionSlope, "J", reach.friction_slope, DIMENSIONLESS, ctx.clone());
            trace.record(Equation::LocalLoss, "h_s", reach.local_loss, M, ctx.clone());
            trace.record(Equation::FrictionLoss, "h_f", reach.friction_loss, M, ctx.clone());
            trace.record(Equation::EnergyBalance, "h2", reach.upstream.depth, M, ctx);
        }
    }

    let rc = &r.rise_check;
    trace.record(Equation::ManningDischarge, "h", rc.normal_depth, M, "Rise check");
    trace.push("h0", "backwater profile", rc.computed_depth, M, "Rise check");
    trace.record(Equation::RiseLimit, "h_allow", rc.allowed, M, "Rise check");

    trace
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_design() {
        let r = calculate(&FlumeDesignInput::example(), &DesignSettings::default()).unwrap();
        assert!(r.width.is_feasible);
        assert!((r.dimension - 2.0).abs() < 1e-9);
        assert!((r.freeboard.required_height - 3.8376).abs() < 0.002);
        assert!((r.floor.total_drop - 0.1984).abs() < 0.001);
        assert_eq!(r.design_profile.reaches.len(), 6);
        assert!(r.rise_check.passes);
        assert!(r.passes());
    }

    #[test]
    fn test_fixed_dimension_is_used() {
        let mut input = FlumeDesignInput::example();
        input.flume.dimension = Some(2.1);
        let r = calculate(&input, &DesignSettings::default()).unwrap();
        assert_eq!(r.dimension, 2.1);
        assert_eq!(r.flume_section.shape, SectionShape::UShell { r: 2.1 });
    }

    #[test]
    fn test_low_wall_height_reported() {
        let mut input = FlumeDesignInput::example();
        input.wall_height = Some(3.5);
        let r = calculate(&input, &DesignSettings::default()).unwrap();
        assert!(!r.wall_height_adequate);
        assert!(!r.passes());
    }

    #[test]
    fn test_checked_below_design_rejected() {
        let mut input = FlumeDesignInput::example();
        input.checked_discharge = 15.0;
        let err = calculate(&input, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_solver_failure_names_step() {
        let mut input = FlumeDesignInput::example();
        // Too narrow for any depth in the bracket
        input.flume.dimension = Some(0.5);
        let err = calculate(&input, &DesignSettings::default()).unwrap_err();
        match err {
            CalcError::CalculationFailed { calculation_type, reason } => {
                assert_eq!(calculation_type, "Freeboard");
                assert!(reason.contains("No sign change"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_report_contents() {
        let r = calculate(&FlumeDesignInput::example(), &DesignSettings::default()).unwrap();
        let z1 = r.report.find("Z1", "Inlet transition").unwrap();
        assert_eq!(z1.value, r.floor.inlet_drop);
        assert!(r.report.find("h2", "Flume segment 4, Q = 24").is_some());
        assert!(r.report.equations().unique_equations().contains(&Equation::EnergyBalance));
    }

    #[test]
    fn test_input_json_roundtrip() {
        let input = FlumeDesignInput::example();
        let json = serde_json::to_string(&input).unwrap();
        assert!(!json.contains("wall_height"));
        let back: FlumeDesignInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.flume.kind, ShapeKind::UShell);
        assert_eq!(back.upstream_canal, input.upstream_canal);
    }
}
