//! # Open-Channel Flow Formulas
//!
//! Uniform-flow, critical-flow and energy-loss relations shared by the depth
//! solvers, the floor elevation calculation and the backwater solver.
//!
//! ## Notation
//!
//! - `Q` = Discharge (m³/s)
//! - `A` = Wetted area (m²)
//! - `R` = Hydraulic radius (m)
//! - `B` = Water-surface width (m)
//! - `n` = Manning roughness
//! - `i` = Bed slope
//! - `g` = Gravitational acceleration (m/s²)
//! - `ξ` = Local (transition) loss coefficient
//!
//! ## Sign Conventions
//!
//! - Sections are numbered in the direction of solving: section 1 is the known
//!   (downstream) section, section 2 the unknown (upstream) one.
//! - Water-surface drops Z are positive when the surface falls in the flow
//!   direction.
//!
//! ## References
//!
//! - Chow, *Open-Channel Hydraulics*, Ch. 5 (Manning), Ch. 10 (standard step)
//! - SL 482-2011, aqueduct water-surface drawdown formulas

/// Manning uniform-flow discharge.
///
/// # Formula
/// Q = (1/n)·A·R^(2/3)·i^(1/2)
///
/// # Example
/// ```rust
/// use hydro_core::equations::hydraulics::manning_discharge;
///
/// // 4.5 m rectangular flume flowing 2.8627 m deep
/// let q = manning_discharge(12.882, 1.2598, 0.014, 0.0005);
/// assert!((q - 24.0).abs() < 0.01);
/// ```
#[inline]
pub fn manning_discharge(area: f64, hydraulic_radius: f64, n: f64, slope: f64) -> f64 {
    area * hydraulic_radius.powf(2.0 / 3.0) * slope.sqrt() / n
}

/// Mean velocity v = Q/A, zero for a dry section
#[inline]
pub fn mean_velocity(discharge: f64, area: f64) -> f64 {
    if area > 0.0 {
        discharge / area
    } else {
        0.0
    }
}

/// Froude criterion used for critical depth.
///
/// # Formula
/// Fr = Q²·B / (g·A³)
///
/// Fr = 1 at critical depth, Fr < 1 for subcritical flow. Note this is the
/// square of the velocity/celerity ratio; the critical condition is the same.
#[inline]
pub fn froude_number(discharge: f64, area: f64, top_width: f64, g: f64) -> f64 {
    if area > 0.0 {
        discharge * discharge * top_width / (g * area.powi(3))
    } else {
        f64::INFINITY
    }
}

/// Velocity head Q²/(2g·A²)
#[inline]
pub fn velocity_head(discharge: f64, area: f64, g: f64) -> f64 {
    discharge * discharge / (2.0 * g * area * area)
}

/// Average friction slope between two sections.
///
/// # Formula
/// J = (Q²·n²/2)·(1/(A1²·R1^(4/3)) + 1/(A2²·R2^(4/3)))
pub fn average_friction_slope(discharge: f64, n: f64, a1: f64, r1: f64, a2: f64, r2: f64) -> f64 {
    let term = |a: f64, r: f64| 1.0 / (a * a * r.powf(4.0 / 3.0));
    0.5 * discharge * discharge * n * n * (term(a1, r1) + term(a2, r2))
}

/// Local (transition) head loss.
///
/// # Formula
/// h_s = ξ/(2g)·|Q²/A1² − Q²/A2²|
pub fn local_loss(xi: f64, discharge: f64, a1: f64, a2: f64, g: f64) -> f64 {
    let q2 = discharge * discharge;
    xi / (2.0 * g) * (q2 / (a1 * a1) - q2 / (a2 * a2)).abs()
}

/// Friction head loss h_f = J·L
#[inline]
pub fn friction_loss(friction_slope: f64, length: f64) -> f64 {
    friction_slope * length
}

/// Water-surface drop through the inlet transition.
///
/// # Formula
/// Z1 = (1 + ξ1)·(v² − v1²)/(2g) + J·L1
///
/// `v` is the flume velocity, `v1` the upstream canal velocity.
pub fn inlet_drop(xi1: f64, v_flume: f64, v_canal: f64, friction_slope: f64, length: f64, g: f64) -> f64 {
    (1.0 + xi1) * (v_flume * v_flume - v_canal * v_canal) / (2.0 * g) + friction_slope * length
}

/// Water-surface drop along the flume barrel: Z2 = i·L
#[inline]
pub fn flume_drop(slope: f64, length: f64) -> f64 {
    slope * length
}

/// Water-surface recovery through the outlet transition.
///
/// # Formula
/// Z3 = (1 − ξ2)·(v² − v2²)/(2g) − J·L2
///
/// `v` is the flume velocity, `v2` the downstream canal velocity.
pub fn outlet_recovery(xi2: f64, v_flume: f64, v_canal: f64, friction_slope: f64, length: f64, g: f64) -> f64 {
    (1.0 - xi2) * (v_flume * v_flume - v_canal * v_canal) / (2.0 * g) - friction_slope * length
}

/// Total water-surface drop across the aqueduct: ΔZ = Z1 + Z2 − Z3
#[inline]
pub fn total_drop(z1: f64, z2: f64, z3: f64) -> f64 {
    z1 + z2 - z3
}
