//! # Hydraulic Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable) with `validate()`
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, settings) -> CalcResult<*Result>` - Pure calculation function
//!
//! The depth solvers are plain functions over a [`ChannelSection`](crate::channel::ChannelSection)
//! and are called by everything above them.
//!
//! ## Available Calculations
//!
//! - [`normal_depth`] - Uniform-flow depth from Manning's equation
//! - [`critical_depth`] - Depth where the Froude criterion equals one
//! - [`width`] - Barrel width window from the depth/width ratio
//! - [`freeboard`] - Minimum wall height
//! - [`floor`] - Water-surface drawdown and floor elevations
//! - [`backwater`] - Standard-step profile through transitions and barrel
//! - [`rise_check`] - Upstream water-surface rise limit
//! - [`flume_design`] - All of the above in sequence

pub mod backwater;
pub mod critical_depth;
pub mod floor;
pub mod flume_design;
pub mod freeboard;
pub mod normal_depth;
pub mod rise_check;
pub mod width;

pub use backwater::{solve_reach, BackwaterReach, ProfileLayout, ReachResult, TransitionSpec, WaterSurfaceProfile};
pub use critical_depth::{solve_critical_depth, CriticalDepth};
pub use floor::{FloorElevations, FloorInput, FloorResult};
pub use flume_design::{FlumeDesignInput, FlumeDesignResult, FlumeSpec};
pub use freeboard::{FreeboardInput, FreeboardResult, GoverningFlow};
pub use normal_depth::{solve_normal_depth, DepthSolution};
pub use rise_check::RiseCheck;
pub use width::{WidthInput, WidthResult, WidthTrial};
