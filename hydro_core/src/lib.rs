//! # hydro_core - Aqueduct Hydraulic Design Engine
//!
//! `hydro_core` sizes aqueduct flumes and checks their hydraulics: barrel
//! width from the permissible depth/width ratio, wall height, floor levels
//! from the water-surface drawdown, and the backwater profile through the
//! structure at checked discharge. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Solvers take sections and settings and return snapshots
//! - **Explicit context**: Gravity, tolerances and code limits live in
//!   [`DesignSettings`](project::DesignSettings), passed to every solver
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use hydro_core::calculations::flume_design::{calculate, FlumeDesignInput};
//! use hydro_core::project::DesignSettings;
//!
//! let result = calculate(&FlumeDesignInput::example(), &DesignSettings::default()).unwrap();
//! println!("r = {:.2} m, H = {:.2} m", result.dimension, result.freeboard.required_height);
//! ```
//!
//! ## Modules
//!
//! - [`channel`] - Cross-section shapes and hydraulic state snapshots
//! - [`solver`] - Bisection root finder
//! - [`calculations`] - Depth, width, freeboard, floor, backwater and the full design
//! - [`equations`] - Closed-form formulas and the equation registry
//! - [`report`] - Ordered trace of computed quantities
//! - [`project`] - Project container, metadata, and settings
//! - [`units`] - Unit labels and the slope type
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic JSON saves and project loading

pub mod calculations;
pub mod channel;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod report;
pub mod solver;
pub mod units;

pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, save_result};
pub use project::{DesignSettings, Project, ProjectMetadata};
