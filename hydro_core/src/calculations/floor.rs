//! # Water-Surface Drawdown and Floor Elevations
//!
//! At design discharge all three sections (upstream canal, flume barrel,
//! downstream canal) run at normal depth. The water surface falls through
//! the inlet transition, along the barrel, and partly recovers through the
//! outlet transition:
//!
//! ```text
//! Z1 = (1 + ξ1)(v² − v1²)/(2g) + J12·L1      inlet drop
//! Z2 = i·L                                   barrel drop
//! Z3 = (1 − ξ2)(v² − v2²)/(2g) − J34·L2      outlet recovery
//! ΔZ = Z1 + Z2 − Z3
//! ```
//!
//! Floor elevations then follow from the upstream canal floor N3:
//!
//! ```text
//! N1 = N3 + h1 − Z1 − h      flume inlet floor
//! N2 = N1 − i·L              flume outlet floor
//! N4 = N2 + h + Z3 − h2      downstream canal floor
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::normal_depth::solve_normal_depth;
use crate::channel::{ChannelSection, HydraulicState};
use crate::equations::hydraulics;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::project::DesignSettings;

/// Input for the floor elevation calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorInput {
    /// Upstream canal section
    pub upstream: ChannelSection,
    /// Flume barrel section (final dimensions)
    pub flume: ChannelSection,
    /// Downstream canal section
    pub downstream: ChannelSection,
    /// Inlet transition length L1 (m)
    pub inlet_length: f64,
    /// Flume length L (m)
    pub flume_length: f64,
    /// Outlet transition length L2 (m)
    pub outlet_length: f64,
    /// Inlet transition roughness n1
    pub inlet_roughness: f64,
    /// Outlet transition roughness n2
    pub outlet_roughness: f64,
    /// Inlet local loss coefficient ξ1
    pub inlet_loss: f64,
    /// Outlet local loss coefficient ξ2
    pub outlet_loss: f64,
    /// Upstream canal floor elevation N3 (m)
    pub upstream_floor: f64,
    /// Design discharge (m³/s)
    pub discharge: f64,
}

impl FloorInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.upstream.validate("upstream")?;
        self.flume.validate("flume")?;
        self.downstream.validate("downstream")?;
        require_positive("inlet_length", self.inlet_length)?;
        require_positive("flume_length", self.flume_length)?;
        require_positive("outlet_length", self.outlet_length)?;
        require_positive("inlet_roughness", self.inlet_roughness)?;
        require_positive("outlet_roughness", self.outlet_roughness)?;
        require_non_negative("inlet_loss", self.inlet_loss)?;
        require_non_negative("outlet_loss", self.outlet_loss)?;
        require_positive("discharge", self.discharge)?;
        if !self.upstream_floor.is_finite() {
            return Err(CalcError::invalid_input(
                "upstream_floor",
                self.upstream_floor.to_string(),
                "Elevation must be finite",
            ));
        }
        Ok(())
    }
}

/// Floor (invert) elevations along the structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorElevations {
    /// Flume inlet floor N1 (m)
    pub flume_inlet: f64,
    /// Flume outlet floor N2 (m)
    pub flume_outlet: f64,
    /// Upstream canal floor N3 (m)
    pub upstream_canal: f64,
    /// Downstream canal floor N4 (m)
    pub downstream_canal: f64,
}

/// Floor elevation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorResult {
    /// Upstream canal at normal depth h1
    pub upstream: HydraulicState,
    /// Flume at normal depth h
    pub flume: HydraulicState,
    /// Downstream canal at normal depth h2
    pub downstream: HydraulicState,
    /// Average friction slope through the inlet transition J12
    pub inlet_friction_slope: f64,
    /// Average friction slope through the outlet transition J34
    pub outlet_friction_slope: f64,
    /// Inlet drop Z1 (m)
    pub inlet_drop: f64,
    /// Barrel drop Z2 (m)
    pub flume_drop: f64,
    /// Outlet recovery Z3 (m)
    pub outlet_recovery: f64,
    /// Total drop ΔZ (m)
    pub total_drop: f64,
    /// Floor elevations N1..N4
    pub elevations: FloorElevations,
}

/// Compute drawdown and floor elevations at design discharge.
pub fn calculate(input: &FloorInput, settings: &DesignSettings) -> CalcResult<FloorResult> {
    input.validate()?;
    let q = input.discharge;
    let g = settings.constants.gravity;

    let up = solve_normal_depth(&input.upstream, q, settings)?.state;
    let fl = solve_normal_depth(&input.flume, q, settings)?.state;
    let down = solve_normal_depth(&input.downstream, q, settings)?.state;

    let j12 = hydraulics::average_friction_slope(
        q,
        input.inlet_roughness,
        up.area,
        up.hydraulic_radius,
        fl.area,
        fl.hydraulic_radius,
    );
    let j34 = hydraulics::average_friction_slope(
        q,
        input.outlet_roughness,
        fl.area,
        fl.hydraulic_radius,
        down.area,
        down.hydraulic_radius,
    );

    let z1 = hydraulics::inlet_drop(input.inlet_loss, fl.velocity, up.velocity, j12, input.inlet_length, g);
    let z2 = hydraulics::flume_drop(input.flume.slope.value(), input.flume_length);
    let z3 = hydraulics::outlet_recovery(input.outlet_loss, fl.velocity, down.velocity, j34, input.outlet_length, g);
    let total = hydraulics::total_drop(z1, z2, z3);

    let n3 = input.upstream_floor;
    let n1 = n3 + up.depth - z1 - fl.depth;
    let n2 = n1 - z2;
    let n4 = n2 + fl.depth + z3 - down.depth;

    debug!(z1, z2, z3, total, n1, n2, n4, "floor elevations");

    Ok(FloorResult {
        upstream: up,
        flume: fl,
        downstream: down,
        inlet_friction_slope: j12,
        outlet_friction_slope: j34,
        inlet_drop: z1,
        flume_drop: z2,
        outlet_recovery: z3,
        total_drop: total,
        elevations: FloorElevations {
            flume_inlet: n1,
            flume_outlet: n2,
            upstream_canal: n3,
            downstream_canal: n4,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::SectionShape;
    use crate::units::Slope;

    fn input() -> FloorInput {
        FloorInput {
            upstream: ChannelSection::new(SectionShape::Trapezoidal { b: 5.5, m: 0.5 }, 0.015, Slope::one_in(9000.0)),
            flume: ChannelSection::new(SectionShape::UShell { r: 2.0 }, 0.014, Slope::one_in(2000.0)),
            downstream: ChannelSection::new(
                SectionShape::Trapezoidal { b: 4.0, m: 1.25 },
                0.017,
                Slope::one_in(15000.0),
            ),
            inlet_length: 15.0,
            flume_length: 200.0,
            outlet_length: 15.0,
            inlet_roughness: 0.014,
            outlet_roughness: 0.014,
            inlet_loss: 0.3,
            outlet_loss: 0.5,
            upstream_floor: 255.0,
            discharge: 20.0,
        }
    }

    #[test]
    fn test_design_depths_and_velocities() {
        let r = calculate(&input(), &DesignSettings::default()).unwrap();
        assert!((r.upstream.depth - 2.8974).abs() < 0.001);
        assert!((r.flume.depth - 3.1109).abs() < 0.001);
        assert!((r.downstream.depth - 3.3547).abs() < 0.001);
        assert!((r.flume.velocity - 1.8645).abs() < 0.001);
    }

    #[test]
    fn test_drops() {
        let r = calculate(&input(), &DesignSettings::default()).unwrap();
        assert!((r.inlet_drop - 0.1694).abs() < 0.001);
        assert!((r.flume_drop - 0.1).abs() < 1e-12);
        assert!((r.outlet_recovery - 0.0710).abs() < 0.001);
        assert!((r.total_drop - 0.1984).abs() < 0.001);
    }

    #[test]
    fn test_elevations() {
        let r = calculate(&input(), &DesignSettings::default()).unwrap();
        let e = r.elevations;
        assert!((e.flume_inlet - 254.617).abs() < 0.002);
        assert!((e.flume_outlet - 254.517).abs() < 0.002);
        assert!((e.downstream_canal - 254.344).abs() < 0.002);
        assert_eq!(e.upstream_canal, 255.0);
    }

    #[test]
    fn test_water_surface_falls_by_total_drop() {
        let r = calculate(&input(), &DesignSettings::default()).unwrap();
        let e = r.elevations;
        let upstream_ws = e.upstream_canal + r.upstream.depth;
        let downstream_ws = e.downstream_canal + r.downstream.depth;
        assert!((upstream_ws - downstream_ws - r.total_drop).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_zero_length() {
        let bad = FloorInput {
            inlet_length: 0.0,
            ..input()
        };
        assert!(calculate(&bad, &DesignSettings::default()).is_err());
    }
}
