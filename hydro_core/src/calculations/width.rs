//! # Flume Width Design
//!
//! Sizes the flume barrel so that the depth/width ratio β stays inside the
//! code's permissible range at both design and checked discharge.
//!
//! The characteristic dimension (bottom width `b`, or radius `r` for a
//! U-shell) is the unknown. For each trial dimension the depth follows
//! directly from the ratio:
//!
//! - Rectangular / trapezoidal: h = β·b
//! - U-shell: h = β·2r (the ratio is taken against the internal diameter)
//!
//! and the Manning residual `Q − Q_manning` is bisected over the dimension.
//!
//! Four trials bound the feasible window:
//!
//! | Trial | Discharge | Ratio | Bound |
//! |-------|-----------|-------|-------|
//! | 1 | Q_s | β_max | lower |
//! | 2 | Q_s | β_min | upper |
//! | 3 | Q_j | β_max | lower |
//! | 4 | Q_j | β_min | upper |
//!
//! The window is `[max(lower trials), min(upper trials)]`. The suggested
//! dimension is the lower bound rounded up to the rounding step; the caller
//! may pick any value in the window.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::width::{calculate, WidthInput};
//! use hydro_core::channel::ShapeKind;
//! use hydro_core::project::DesignSettings;
//! use hydro_core::units::Slope;
//!
//! let input = WidthInput {
//!     kind: ShapeKind::UShell,
//!     side_slope: None,
//!     roughness: 0.014,
//!     slope: Slope::one_in(2000.0),
//!     design_discharge: 20.0,
//!     checked_discharge: 24.0,
//! };
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//! assert!(result.is_feasible);
//! assert!((result.suggested - 2.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::channel::{ChannelSection, SectionShape, ShapeKind};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::project::{DesignSettings, RatioRange};
use crate::solver::bisect;
use crate::units::Slope;

/// Input for the width window search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidthInput {
    /// Flume shape family
    pub kind: ShapeKind,
    /// Side slope m, required for trapezoidal flumes
    #[serde(default)]
    pub side_slope: Option<f64>,
    /// Manning roughness n
    pub roughness: f64,
    /// Flume bed slope i
    pub slope: Slope,
    /// Design discharge Q_s (m³/s)
    pub design_discharge: f64,
    /// Checked (enlarged) discharge Q_j (m³/s)
    pub checked_discharge: f64,
}

impl WidthInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("roughness", self.roughness)?;
        self.slope.validate("slope")?;
        require_positive("design_discharge", self.design_discharge)?;
        require_positive("checked_discharge", self.checked_discharge)?;
        if self.kind == ShapeKind::Trapezoidal {
            match self.side_slope {
                Some(m) => require_non_negative("side_slope", m)?,
                None => return Err(CalcError::missing_field("side_slope")),
            }
        }
        Ok(())
    }

    /// Section with a placeholder dimension, ready for `with_dimension`
    fn template(&self) -> ChannelSection {
        let shape = match self.kind {
            ShapeKind::Rectangular => SectionShape::Rectangular { b: 1.0 },
            ShapeKind::Trapezoidal => SectionShape::Trapezoidal {
                b: 1.0,
                m: self.side_slope.unwrap_or(0.0),
            },
            ShapeKind::UShell => SectionShape::UShell { r: 1.0 },
        };
        ChannelSection::new(shape, self.roughness, self.slope)
    }
}

/// One width trial at a fixed discharge and ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthTrial {
    /// Discharge used (m³/s)
    pub discharge: f64,
    /// Depth/width ratio β
    pub ratio: f64,
    /// Solved dimension (`b` or `r`, m)
    pub dimension: f64,
    /// Depth implied by the ratio (m)
    pub depth: f64,
    /// Wetted area at that depth (m²)
    pub area: f64,
    /// Hydraulic radius at that depth (m)
    pub hydraulic_radius: f64,
    /// Bisection iterations used
    pub iterations: usize,
}

/// Width window and suggested dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidthResult {
    /// Shape family sized
    pub kind: ShapeKind,
    /// Ratio range applied
    pub ratio_range: RatioRange,
    /// Trials in order: (Q_s, β_max), (Q_s, β_min), (Q_j, β_max), (Q_j, β_min)
    pub trials: [WidthTrial; 4],
    /// Smallest dimension keeping β ≤ β_max at both discharges (m)
    pub lower_bound: f64,
    /// Largest dimension keeping β ≥ β_min at both discharges (m)
    pub upper_bound: f64,
    /// Lower bound rounded up to the rounding step (m)
    pub suggested: f64,
    /// True when the suggested dimension lies within the window
    pub is_feasible: bool,
}

impl WidthResult {
    /// Whether a chosen dimension lies inside the window
    pub fn contains(&self, dimension: f64) -> bool {
        dimension >= self.lower_bound - 1e-9 && dimension <= self.upper_bound + 1e-9
    }
}

/// Depth implied by ratio β for a section of the given dimension
pub fn depth_from_ratio(kind: ShapeKind, ratio: f64, dimension: f64) -> f64 {
    match kind {
        ShapeKind::UShell => ratio * 2.0 * dimension,
        ShapeKind::Rectangular | ShapeKind::Trapezoidal => ratio * dimension,
    }
}

/// Solve the dimension carrying `q` at depth/width ratio `ratio`.
pub fn solve_width(input: &WidthInput, q: f64, ratio: f64, settings: &DesignSettings) -> CalcResult<WidthTrial> {
    input.validate()?;
    require_positive("ratio", ratio)?;
    require_positive("discharge", q)?;
    let template = input.template();

    let root = bisect(
        |w| {
            let section = template.with_dimension(w);
            q - section.manning_discharge(depth_from_ratio(input.kind, ratio, w))
        },
        settings.depth_bracket,
        &settings.bisection,
    )?;

    let dimension = root.root;
    let depth = depth_from_ratio(input.kind, ratio, dimension);
    let shape = template.shape.with_dimension(dimension);

    debug!(
        kind = input.kind.display_name(),
        discharge = q,
        ratio,
        dimension,
        iterations = root.iterations,
        "width trial solved"
    );

    Ok(WidthTrial {
        discharge: q,
        ratio,
        dimension,
        depth,
        area: shape.area(depth),
        hydraulic_radius: shape.hydraulic_radius(depth),
        iterations: root.iterations,
    })
}

/// Round `value` up to the next multiple of `step`.
pub fn round_up(value: f64, step: f64) -> f64 {
    let scaled = value / step;
    // Guard against 2.0000000001 becoming 2.1
    let rounded = if (scaled - scaled.round()).abs() < 1e-9 {
        scaled.round()
    } else {
        scaled.ceil()
    };
    // Divide by the whole count per unit so 41 steps of 0.1 land on 4.1 exactly
    rounded / step.recip()
}

/// Run the four width trials and build the feasible window.
pub fn calculate(input: &WidthInput, settings: &DesignSettings) -> CalcResult<WidthResult> {
    input.validate()?;
    let range = settings.ratio_for(input.kind);
    range.validate("ratio_range")?;

    let qs = input.design_discharge;
    let qj = input.checked_discharge;
    let trials = [
        solve_width(input, qs, range.max, settings)?,
        solve_width(input, qs, range.min, settings)?,
        solve_width(input, qj, range.max, settings)?,
        solve_width(input, qj, range.min, settings)?,
    ];

    let lower_bound = trials[0].dimension.max(trials[2].dimension);
    let upper_bound = trials[1].dimension.min(trials[3].dimension);
    let suggested = round_up(lower_bound, settings.width_rounding);
    let is_feasible = suggested <= upper_bound;

    if !is_feasible {
        warn!(
            lower_bound,
            upper_bound,
            suggested,
            "no practical flume dimension satisfies the depth/width ratio at both discharges"
        );
    }

    Ok(WidthResult {
        kind: input.kind,
        ratio_range: range,
        trials,
        lower_bound,
        upper_bound,
        suggested,
        is_feasible,
    })
}
