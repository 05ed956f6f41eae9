//! # Cross-Section Geometry Formulas
//!
//! Wetted area, wetted perimeter and top width for the three channel shapes
//! used in aqueduct design. All functions take the water depth `h` and the
//! shape parameters in metres and are pure.
//!
//! ## Notation
//!
//! - `h` = Water depth above the invert
//! - `b` = Bottom width (rectangle, trapezoid)
//! - `m` = Trapezoid side slope, horizontal : vertical
//! - `r` = U-shell invert radius
//! - `θ` = Central angle subtended by the water surface when `h < r`
//!
//! ## References
//!
//! - Chow, *Open-Channel Hydraulics*, Table 2-1
//! - SL 482-2011 Appendix: U-shell flume section elements

use std::f64::consts::PI;

// =============================================================================
// RECTANGULAR SECTION
// =============================================================================

/// Wetted area of a rectangular channel.
///
/// ```text
///   │~~~~~~~~~│  ─┬─
///   │         │   h
///   └─────────┘  ─┴─
///        b
/// ```
///
/// # Formula
/// A = b·h
///
/// # Example
/// ```rust
/// use hydro_core::equations::section::rectangular_area;
///
/// let a = rectangular_area(4.5, 2.8627);
/// assert!((a - 12.882).abs() < 0.001);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Wetted perimeter of a rectangular channel: P = b + 2h
#[inline]
pub fn rectangular_wetted_perimeter(b: f64, h: f64) -> f64 {
    b + 2.0 * h
}

// =============================================================================
// TRAPEZOIDAL SECTION
// =============================================================================

/// Wetted area of a trapezoidal channel.
///
/// ```text
///   \~~~~~~~~~~~~~/  ─┬─
///    \           /    h
///     \_________/    ─┴─
///          b       1:m side slopes
/// ```
///
/// # Formula
/// A = (b + m·h)·h
///
/// # Example
/// ```rust
/// use hydro_core::equations::section::trapezoidal_area;
///
/// let a = trapezoidal_area(5.5, 0.5, 3.2338);
/// assert!((a - 23.014).abs() < 0.001);
/// ```
#[inline]
pub fn trapezoidal_area(b: f64, m: f64, h: f64) -> f64 {
    (b + m * h) * h
}

/// Wetted perimeter of a trapezoidal channel: P = b + 2h·√(1 + m²)
#[inline]
pub fn trapezoidal_wetted_perimeter(b: f64, m: f64, h: f64) -> f64 {
    b + 2.0 * h * (1.0 + m * m).sqrt()
}

/// Water-surface width of a trapezoidal channel: B = b + 2m·h
#[inline]
pub fn trapezoidal_top_width(b: f64, m: f64, h: f64) -> f64 {
    b + 2.0 * m * h
}

// =============================================================================
// U-SHELL SECTION
// Semicircular invert of radius r with vertical walls above h = r
// =============================================================================

/// Central angle subtended by the water surface for `h < r`.
///
/// # Formula
/// θ = 2·acos((r − h)/r)
///
/// Clamped so that `h >= r` returns π (the half circle is full).
#[inline]
pub fn ushell_theta(r: f64, h: f64) -> f64 {
    let cos_half = ((r - h) / r).clamp(-1.0, 1.0);
    2.0 * cos_half.acos()
}

/// Wetted area of a U-shell flume.
///
/// ```text
///   │~~~~~~~~~│  ─┬─
///   │         │   h - r
///   │         │  ─┼─
///    \       /    r
///      `───´     ─┴─
/// ```
///
/// # Formula
/// - h ≥ r: A = π·r²/2 + 2r·(h − r)
/// - h < r: A = (r²/2)·(θ − sin θ)
///
/// Both branches give π·r²/2 at h = r.
///
/// # Example
/// ```rust
/// use hydro_core::equations::section::ushell_area;
///
/// let a = ushell_area(2.3, 3.1445);
/// assert!((a - 12.1942).abs() < 0.001);
/// ```
pub fn ushell_area(r: f64, h: f64) -> f64 {
    if h >= r {
        0.5 * PI * r * r + 2.0 * r * (h - r)
    } else {
        let theta = ushell_theta(r, h);
        0.5 * r * r * (theta - theta.sin())
    }
}

/// Wetted perimeter of a U-shell flume.
///
/// - h ≥ r: P = π·r + 2(h − r)
/// - h < r: P = r·θ
pub fn ushell_wetted_perimeter(r: f64, h: f64) -> f64 {
    if h >= r {
        PI * r + 2.0 * (h - r)
    } else {
        r * ushell_theta(r, h)
    }
}

/// Hydraulic radius of a U-shell flume in closed form.
///
/// - h ≥ r: R = (r/2)·(1 + 2(h − r)/(π·r + 2(h − r)))
/// - h < r: R = (r/2)·(1 − sin θ/θ)
///
/// Returns 0 for a dry section.
pub fn ushell_hydraulic_radius(r: f64, h: f64) -> f64 {
    if h >= r {
        let wall = 2.0 * (h - r);
        0.5 * r * (1.0 + wall / (PI * r + wall))
    } else {
        let theta = ushell_theta(r, h);
        if theta <= 0.0 {
            return 0.0;
        }
        0.5 * r * (1.0 - theta.sin() / theta)
    }
}

/// Water-surface width of a U-shell flume.
///
/// - h ≥ r: B = 2r
/// - h < r: B = 2r·sin(θ/2)
pub fn ushell_top_width(r: f64, h: f64) -> f64 {
    if h >= r {
        2.0 * r
    } else {
        2.0 * r * (0.5 * ushell_theta(r, h)).sin()
    }
}

// =============================================================================
// SHARED
// =============================================================================

/// Hydraulic radius R = A/P, zero when the perimeter vanishes
#[inline]
pub fn hydraulic_radius(area: f64, wetted_perimeter: f64) -> f64 {
    if wetted_perimeter > 0.0 {
        area / wetted_perimeter
    } else {
        0.0
    }
}
