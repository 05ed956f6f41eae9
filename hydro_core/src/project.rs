//! # Project Data Structures
//!
//! A `Project` bundles everything needed to rerun an aqueduct design: who it
//! is for, the solver settings, and the design input. Projects serialize to
//! `.aqd` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (constants, solver options, code limits)
//! └── design: FlumeDesignInput
//! ```
//!
//! `DesignSettings` is the context object every solver receives. Nothing in
//! the crate reads gravity, tolerances or code limits from a global.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::project::Project;
//! use hydro_core::calculations::flume_design::FlumeDesignInput;
//!
//! let project = Project::new("Jane Engineer", "26-017", "Irrigation District", FlumeDesignInput::example());
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("26-017"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::flume_design::FlumeDesignInput;
use crate::channel::ShapeKind;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::solver::{BisectionOptions, Bracket};

/// Current schema version for .aqd files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Solver settings and code limits
    #[serde(default)]
    pub settings: DesignSettings,

    /// The aqueduct to design
    pub design: FlumeDesignInput,
}

impl Project {
    /// Create a new project around a design input.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "26-017")
    /// * `client` - Client name
    /// * `design` - Aqueduct design input
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        design: FlumeDesignInput,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            design,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Physical constants passed to the solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicConstants {
    /// Gravitational acceleration g (m/s²)
    pub gravity: f64,
}

impl Default for HydraulicConstants {
    fn default() -> Self {
        HydraulicConstants { gravity: 9.81 }
    }
}

/// Permissible depth/width ratio range β ∈ [min, max].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRange {
    pub min: f64,
    pub max: f64,
}

impl RatioRange {
    pub fn new(min: f64, max: f64) -> Self {
        RatioRange { min, max }
    }

    pub fn validate(&self, field: &str) -> CalcResult<()> {
        require_positive(&format!("{field}.min"), self.min)?;
        require_positive(&format!("{field}.max"), self.max)?;
        if self.min > self.max {
            return Err(CalcError::invalid_input(
                field,
                format!("[{}, {}]", self.min, self.max),
                "Minimum ratio exceeds maximum",
            ));
        }
        Ok(())
    }
}

/// Solver settings and design-code limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Physical constants
    pub constants: HydraulicConstants,

    /// Root finder tolerance and iteration cap
    pub bisection: BisectionOptions,

    /// Search interval for depths and section dimensions (m)
    pub depth_bracket: Bracket,

    /// Offset above critical depth for the backwater search's lower bound (m)
    pub critical_offset: f64,

    /// Allowed ratio of checked-flow depth to normal depth
    pub rise_limit: f64,

    /// Maximum flume segment length in the backwater chain (m)
    pub flume_segment_length: f64,

    /// Permissible depth/width ratio for U-shell flumes
    pub ushell_ratio: RatioRange,

    /// Permissible depth/width ratio for rectangular flumes
    pub rect_ratio: RatioRange,

    /// Rounding step for the suggested flume width (m)
    pub width_rounding: f64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            constants: HydraulicConstants::default(),
            bisection: BisectionOptions::default(),
            depth_bracket: Bracket::default(),
            critical_offset: 1e-4,
            rise_limit: 1.03,
            flume_segment_length: 50.0,
            ushell_ratio: RatioRange::new(0.7, 0.9),
            rect_ratio: RatioRange::new(0.6, 0.8),
            width_rounding: 0.1,
        }
    }
}

impl DesignSettings {
    /// Permissible depth/width ratio for a flume shape
    pub fn ratio_for(&self, kind: ShapeKind) -> RatioRange {
        match kind {
            ShapeKind::UShell => self.ushell_ratio,
            ShapeKind::Rectangular | ShapeKind::Trapezoidal => self.rect_ratio,
        }
    }

    /// Validate settings before a run.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("constants.gravity", self.constants.gravity)?;
        require_positive("bisection.tolerance", self.bisection.tolerance)?;
        if self.bisection.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "bisection.max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        require_positive("depth_bracket.left", self.depth_bracket.left)?;
        if self.depth_bracket.right <= self.depth_bracket.left {
            return Err(CalcError::invalid_input(
                "depth_bracket",
                format!("[{}, {}]", self.depth_bracket.left, self.depth_bracket.right),
                "Right end must exceed left end",
            ));
        }
        require_positive("critical_offset", self.critical_offset)?;
        require_positive("rise_limit", self.rise_limit)?;
        require_positive("flume_segment_length", self.flume_segment_length)?;
        require_positive("width_rounding", self.width_rounding)?;
        self.ushell_ratio.validate("ushell_ratio")?;
        self.rect_ratio.validate("rect_ratio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "26-001", "Acme Water", FlumeDesignInput::example());
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "26-001");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings, DesignSettings::default());
    }

    #[test]
    fn test_project_serialization() {
        let project = Project::new("Jane Engineer", "26-042", "Test Client", FlumeDesignInput::example());
        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("\"rise_limit\": 1.03"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Jane Engineer");
        assert_eq!(roundtrip.design.design_discharge, project.design.design_discharge);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: DesignSettings = serde_json::from_str(r#"{ "rise_limit": 1.05 }"#).unwrap();
        assert_eq!(settings.rise_limit, 1.05);
        assert_eq!(settings.flume_segment_length, 50.0);
        assert_eq!(settings.bisection.max_iterations, 25);
    }

    #[test]
    fn test_settings_validation() {
        assert!(DesignSettings::default().validate().is_ok());

        let mut settings = DesignSettings::default();
        settings.rect_ratio = RatioRange::new(0.9, 0.6);
        assert!(settings.validate().is_err());

        let mut settings = DesignSettings::default();
        settings.depth_bracket = Bracket::new(0.1, 0.05);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_ratio_for_shape() {
        let settings = DesignSettings::default();
        assert_eq!(settings.ratio_for(ShapeKind::UShell), RatioRange::new(0.7, 0.9));
        assert_eq!(settings.ratio_for(ShapeKind::Rectangular), RatioRange::new(0.6, 0.8));
    }
}
