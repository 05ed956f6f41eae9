//! # Hydraulic Equations
//!
//! The closed-form relations behind every calculation, kept as plain
//! functions of their inputs so each one can be checked against its source.
//!
//! ## Modules
//!
//! - [`section`] - Area, wetted perimeter, hydraulic radius and top width
//! - [`hydraulics`] - Manning, Froude, friction slope, local loss and drawdown
//! - [`registry`] - Equation metadata, usage tracking and the EQUATIONS.md generator
//!
//! ## References
//!
//! - SL 482-2011: design code for irrigation and drainage canal structures
//! - Chow, Open-Channel Hydraulics (1959)

pub mod hydraulics;
pub mod registry;
pub mod section;

pub use hydraulics::{
    average_friction_slope,
    flume_drop,
    friction_loss,
    froude_number,
    inlet_drop,
    local_loss,
    manning_discharge,
    mean_velocity,
    outlet_recovery,
    total_drop,
    velocity_head,
};

pub use section::{
    hydraulic_radius,
    rectangular_area,
    rectangular_wetted_perimeter,
    trapezoidal_area,
    trapezoidal_top_width,
    trapezoidal_wetted_perimeter,
    ushell_area,
    ushell_hydraulic_radius,
    ushell_theta,
    ushell_top_width,
    ushell_wetted_perimeter,
};

pub use registry::{
    generate_equations_markdown,
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
};
