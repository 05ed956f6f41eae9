//! # Backwater Profile (Standard Step)
//!
//! A [`BackwaterReach`] joins a downstream section of known depth `h1` to an
//! upstream section of unknown depth `h2`. The upstream depth balances the
//! energy equation
//!
//! ```text
//! z1 + h1 + Q²/(2g·A1²) + h_s + h_f = z2 + h2 + Q²/(2g·A2²)
//!
//! h_s = ξ/(2g)·|Q²/A1² − Q²/A2²|
//! h_f = J·L,  J = (Q²n²/2)·(1/(A1²R1^(4/3)) + 1/(A2²R2^(4/3)))
//! ```
//!
//! The search starts just above the upstream section's critical depth so
//! that only the subcritical branch is found.
//!
//! [`WaterSurfaceProfile::propagate`] chains the reaches of a whole aqueduct,
//! starting from normal depth in the downstream canal:
//!
//! ```text
//! downstream canal ← outlet transition ← flume segments ← inlet transition ← upstream canal
//! ```
//!
//! Each reach's upstream depth becomes the next reach's downstream depth.
//! The flume is split into segments of at most `flume_segment_length`; the
//! last (upstream-most) segment takes the remainder.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::critical_depth::solve_critical_depth;
use crate::calculations::floor::FloorElevations;
use crate::calculations::normal_depth::solve_normal_depth;
use crate::channel::{ChannelSection, HydraulicState, SectionShape};
use crate::equations::hydraulics;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::project::DesignSettings;
use crate::solver::bisect;

/// Length, roughness and local loss of an inlet or outlet transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Transition length (m)
    pub length: f64,
    /// Manning roughness n
    pub roughness: f64,
    /// Local loss coefficient ξ
    pub loss_coefficient: f64,
}

impl TransitionSpec {
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        require_positive(&format!("{field}.length"), self.length)?;
        require_positive(&format!("{field}.roughness"), self.roughness)?;
        require_non_negative(&format!("{field}.loss_coefficient"), self.loss_coefficient)
    }
}

/// One reach between two cross sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackwaterReach {
    /// Reach name used in logs and reports
    pub label: String,
    /// Downstream section (known depth)
    pub downstream: ChannelSection,
    /// Upstream section (unknown depth)
    pub upstream: ChannelSection,
    /// Reach length L (m)
    pub length: f64,
    /// Roughness used for the friction slope
    pub roughness: f64,
    /// Local loss coefficient ξ
    pub local_loss: f64,
    /// Downstream floor elevation z1 (m)
    pub z_down: f64,
    /// Upstream floor elevation z2 (m)
    pub z_up: f64,
}

impl BackwaterReach {
    pub fn validate(&self) -> CalcResult<()> {
        self.downstream.shape.validate("downstream")?;
        self.upstream.shape.validate("upstream")?;
        require_positive("length", self.length)?;
        require_positive("roughness", self.roughness)?;
        require_non_negative("local_loss", self.local_loss)?;
        if !(self.z_down.is_finite() && self.z_up.is_finite()) {
            return Err(CalcError::invalid_input(
                "z",
                format!("{} / {}", self.z_down, self.z_up),
                "Floor elevations must be finite",
            ));
        }
        Ok(())
    }
}

/// Loss terms of the energy balance at one trial depth.
#[derive(Debug, Clone, Copy)]
struct EnergyTerms {
    friction_slope: f64,
    local_loss: f64,
    friction_loss: f64,
    residual: f64,
}

fn energy_terms(
    reach: &BackwaterReach,
    q: f64,
    g: f64,
    down: (f64, f64, f64),
    up_shape: &SectionShape,
    h2: f64,
) -> EnergyTerms {
    let (h1, a1, r1) = down;
    let a2 = up_shape.area(h2);
    let r2 = up_shape.hydraulic_radius(h2);

    let friction_slope = hydraulics::average_friction_slope(q, reach.roughness, a1, r1, a2, r2);
    let local_loss = hydraulics::local_loss(reach.local_loss, q, a1, a2, g);
    let friction_loss = hydraulics::friction_loss(friction_slope, reach.length);

    let lhs = reach.z_down + h1 + hydraulics::velocity_head(q, a1, g) + local_loss + friction_loss;
    let rhs = reach.z_up + h2 + hydraulics::velocity_head(q, a2, g);

    EnergyTerms {
        friction_slope,
        local_loss,
        friction_loss,
        residual: lhs - rhs,
    }
}

/// Solved reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachResult {
    /// Reach name
    pub label: String,
    /// Downstream section state (h1, A1, R1)
    pub downstream: HydraulicState,
    /// Upstream section state (h2, A2, R2)
    pub upstream: HydraulicState,
    /// Average friction slope J
    pub friction_slope: f64,
    /// Local loss h_s (m)
    pub local_loss: f64,
    /// Friction loss h_f (m)
    pub friction_loss: f64,
    /// Upstream critical depth used to seed the search (m)
    pub critical_depth: f64,
    /// Bisection iterations used
    pub iterations: usize,
    /// Energy balance residual at the solution (m)
    pub residual: f64,
}

/// Solve the upstream depth of `reach` at discharge `q` given the downstream depth.
pub fn solve_reach(reach: &BackwaterReach, q: f64, h_down: f64, settings: &DesignSettings) -> CalcResult<ReachResult> {
    reach.validate()?;
    require_positive("discharge", q)?;
    require_positive("downstream_depth", h_down)?;
    let g = settings.constants.gravity;

    let down_state = reach.downstream.state_at(q, h_down, &settings.constants);
    let down = (h_down, down_state.area, down_state.hydraulic_radius);
    let up_shape = reach.upstream.shape;

    let critical = solve_critical_depth(&up_shape, q, settings)?;
    let bracket = settings.depth_bracket.with_left(critical.depth + settings.critical_offset);
    if bracket.left >= bracket.right {
        return Err(CalcError::bracket(bracket.left, bracket.right, f64::NAN, f64::NAN));
    }

    let root = bisect(
        |h2| energy_terms(reach, q, g, down, &up_shape, h2).residual,
        bracket,
        &settings.bisection,
    )?;
    let terms = energy_terms(reach, q, g, down, &up_shape, root.root);

    debug!(
        reach = %reach.label,
        discharge = q,
        h_down,
        h_up = root.root,
        critical = critical.depth,
        iterations = root.iterations,
        "reach solved"
    );

    Ok(ReachResult {
        label: reach.label.clone(),
        downstream: down_state,
        upstream: reach.upstream.state_at(q, root.root, &settings.constants),
        friction_slope: terms.friction_slope,
        local_loss: terms.local_loss,
        friction_loss: terms.friction_loss,
        critical_depth: critical.depth,
        iterations: root.iterations,
        residual: terms.residual,
    })
}

/// Segment lengths of a flume split into pieces of at most `max_length`,
/// listed downstream first. The last piece takes the remainder.
pub fn flume_segments(length: f64, max_length: f64) -> Vec<f64> {
    let count = (length / max_length).ceil().max(1.0) as usize;
    (0..count)
        .map(|k| (length - max_length * k as f64).min(max_length))
        .collect()
}

/// Geometry and elevations of a complete aqueduct, enough to build its reach chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileLayout {
    pub upstream: ChannelSection,
    pub flume: ChannelSection,
    pub downstream: ChannelSection,
    pub inlet: TransitionSpec,
    pub outlet: TransitionSpec,
    /// Flume length L (m)
    pub flume_length: f64,
    /// Floor elevations N1..N4
    pub elevations: FloorElevations,
}

impl ProfileLayout {
    /// Reaches in solve order: outlet transition, flume segments, inlet transition.
    pub fn reaches(&self, segment_length: f64) -> Vec<BackwaterReach> {
        let e = self.elevations;
        let slope = self.flume.slope.value();
        let mut reaches = vec![BackwaterReach {
            label: "Outlet transition".to_string(),
            downstream: self.downstream,
            upstream: self.flume,
            length: self.outlet.length,
            roughness: self.outlet.roughness,
            local_loss: self.outlet.loss_coefficient,
            z_down: e.downstream_canal,
            z_up: e.flume_outlet,
        }];

        for (k, seg) in flume_segments(self.flume_length, segment_length).into_iter().enumerate() {
            // Invert rises going upstream
            let z_down = e.flume_outlet + slope * segment_length * k as f64;
            reaches.push(BackwaterReach {
                label: format!("Flume segment {}", k + 1),
                downstream: self.flume,
                upstream: self.flume,
                length: seg,
                roughness: self.flume.roughness,
                local_loss: 0.0,
                z_down,
                z_up: z_down + slope * seg,
            });
        }

        reaches.push(BackwaterReach {
            label: "Inlet transition".to_string(),
            downstream: self.flume,
            upstream: self.upstream,
            length: self.inlet.length,
            roughness: self.inlet.roughness,
            local_loss: self.inlet.loss_coefficient,
            z_down: e.flume_inlet,
            z_up: e.upstream_canal,
        });
        reaches
    }
}

/// Water-surface profile through the whole aqueduct at one discharge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterSurfaceProfile {
    /// Discharge Q (m³/s)
    pub discharge: f64,
    /// Normal depth in the downstream canal, the boundary condition (m)
    pub boundary_depth: f64,
    /// Solved reaches in order, downstream first
    pub reaches: Vec<ReachResult>,
}

impl WaterSurfaceProfile {
    /// Propagate the profile upstream from the downstream canal at discharge `q`.
    pub fn propagate(layout: &ProfileLayout, q: f64, settings: &DesignSettings) -> CalcResult<Self> {
        require_positive("flume_length", layout.flume_length)?;
        layout.inlet.validate("inlet")?;
        layout.outlet.validate("outlet")?;

        let boundary = solve_normal_depth(&layout.downstream, q, settings)?;
        let mut depth = boundary.depth();
        let mut reaches = Vec::new();

        for reach in layout.reaches(settings.flume_segment_length) {
            let solved = solve_reach(&reach, q, depth, settings)?;
            depth = solved.upstream.depth;
            reaches.push(solved);
        }

        Ok(WaterSurfaceProfile {
            discharge: q,
            boundary_depth: boundary.depth(),
            reaches,
        })
    }

    /// Depth entering the inlet transition from the upstream canal (m)
    pub fn upstream_depth(&self) -> f64 {
        self.reaches.last().map_or(self.boundary_depth, |r| r.upstream.depth)
    }

    /// The inlet transition, last reach of the chain
    pub fn inlet_reach(&self) -> CalcResult<&ReachResult> {
        self.reaches
            .last()
            .ok_or_else(|| CalcError::internal(format!("profile at Q = {} has no reaches", self.discharge)))
    }

    /// Largest iteration count of any reach
    pub fn max_iterations(&self) -> usize {
        self.reaches.iter().map(|r| r.iterations).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Slope;

    fn layout() -> ProfileLayout {
        ProfileLayout {
            upstream: ChannelSection::new(SectionShape::Trapezoidal { b: 5.5, m: 0.5 }, 0.015, Slope::one_in(9000.0)),
            flume: ChannelSection::new(SectionShape::UShell { r: 2.0 }, 0.014, Slope::one_in(2000.0)),
            downstream: ChannelSection::new(
                SectionShape::Trapezoidal { b: 4.0, m: 1.25 },
                0.017,
                Slope::one_in(15000.0),
            ),
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
            elevations: FloorElevations {
                flume_inlet: 254.61703,
                flume_outlet: 254.51703,
                upstream_canal: 255.0,
                downstream_canal: 254.34426,
            },
        }
    }

    #[test]
    fn test_segments() {
        assert_eq!(flume_segments(200.0, 50.0), vec![50.0; 4]);
        assert_eq!(flume_segments(120.0, 50.0), vec![50.0, 50.0, 20.0]);
        assert_eq!(flume_segments(30.0, 50.0), vec![30.0]);
    }

    #[test]
    fn test_chain_order_and_elevations() {
        let reaches = layout().reaches(50.0);
        assert_eq!(reaches.len(), 6);
        assert_eq!(reaches[0].label, "Outlet transition");
        assert_eq!(reaches[5].label, "Inlet transition");
        // Flume segments climb from N2 to N1
        assert!((reaches[1].z_down - 254.51703).abs() < 1e-9);
        assert!((reaches[4].z_up - 254.61703).abs() < 1e-9);
        for pair in reaches[1..5].windows(2) {
            assert!((pair[0].z_up - pair[1].z_down).abs() < 1e-9);
        }
    }

    #[test]
    fn test_uniform_flow_reach_returns_normal_depth() {
        let settings = DesignSettings::default();
        let flume = layout().flume;
        let h = solve_normal_depth(&flume, 20.0, &settings).unwrap().depth();
        let reach = BackwaterReach {
            label: "uniform".to_string(),
            downstream: flume,
            upstream: flume,
            length: 50.0,
            roughness: flume.roughness,
            local_loss: 0.0,
            z_down: 100.0,
            z_up: 100.0 + 50.0 / 2000.0,
        };
        let solved = solve_reach(&reach, 20.0, h, &settings).unwrap();
        assert!((solved.upstream.depth - h).abs() < 0.002);
        assert!(solved.residual.abs() <= settings.bisection.tolerance);
    }

    #[test]
    fn test_design_profile_recovers_normal_depths() {
        let settings = DesignSettings::default();
        let profile = WaterSurfaceProfile::propagate(&layout(), 20.0, &settings).unwrap();
        assert_eq!(profile.reaches.len(), 6);
        assert!((profile.boundary_depth - 3.3547).abs() < 0.001);
        assert!((profile.reaches[0].upstream.depth - 3.1109).abs() < 0.002);
        assert!((profile.upstream_depth() - 2.8973).abs() < 0.002);
    }

    #[test]
    fn test_checked_profile() {
        let settings = DesignSettings::default();
        let profile = WaterSurfaceProfile::propagate(&layout(), 24.0, &settings).unwrap();
        assert!((profile.boundary_depth - 3.6673).abs() < 0.001);
        assert!((profile.reaches[0].upstream.depth - 3.4106).abs() < 0.002);
        assert!((profile.reaches[0].critical_depth - 1.9716).abs() < 0.002);
        // M2 curve: flume depth starts below normal and rises going upstream
        for pair in profile.reaches[1..5].windows(2) {
            assert!(pair[1].upstream.depth > pair[0].upstream.depth);
        }
        assert!((profile.upstream_depth() - 3.2389).abs() < 0.002);
        assert!(profile.max_iterations() <= settings.bisection.max_iterations);
    }

    #[test]
    fn test_inlet_reach() {
        let settings = DesignSettings::default();
        let mut profile = WaterSurfaceProfile::propagate(&layout(), 24.0, &settings).unwrap();
        let inlet = profile.inlet_reach().unwrap();
        assert_eq!(inlet.label, "Inlet transition");
        assert_eq!(inlet.upstream.depth, profile.upstream_depth());

        profile.reaches.clear();
        assert_eq!(profile.inlet_reach().unwrap_err().error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_zero_length_transition_rejected() {
        let mut bad = layout();
        bad.inlet.length = 0.0;
        let err = WaterSurfaceProfile::propagate(&bad, 20.0, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
