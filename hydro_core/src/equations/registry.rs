//! # Equation Registry
//!
//! Every hydraulic formula the crate evaluates, with the metadata needed to
//! audit it: plain-text formula, variables, category, literature reference,
//! and the function that implements it.
//!
//! ## Usage
//!
//! ```rust
//! use hydro_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::ManningDischarge, "Upstream canal normal depth");
//!
//! let meta = Equation::ManningDischarge.metadata();
//! assert!(meta.formula.contains("R^(2/3)"));
//! assert_eq!(tracker.unique_equations(), vec![Equation::ManningDischarge]);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Source a formula is taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// Design code for canal structures (aqueducts, culverts, drops)
    CanalStructureCode { code: &'static str, year: u16 },
    /// Chow, Open-Channel Hydraulics
    Chow { chapter: u8 },
    /// Plane geometry or basic fluid mechanics
    Mechanics,
}

impl CodeReference {
    /// Full citation for reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::CanalStructureCode { code, year } => format!("{code}-{year}"),
            CodeReference::Chow { chapter } => format!("Chow, Open-Channel Hydraulics, Ch. {chapter}"),
            CodeReference::Mechanics => "Fundamental mechanics".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::CanalStructureCode { code, .. } => *code,
            CodeReference::Chow { .. } => "Chow",
            CodeReference::Mechanics => "Mechanics",
        }
    }
}

const CANAL_CODE: CodeReference = CodeReference::CanalStructureCode {
    code: "SL 482",
    year: 2011,
};

// ============================================================================
// Equation Categories
// ============================================================================

/// Groups used to organize the equation reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Area, perimeter, radius and top width
    SectionGeometry,
    /// Manning's equation and mean velocity
    UniformFlow,
    /// Froude criterion and critical depth
    FlowRegime,
    /// Depth/width ratio sizing
    WidthDesign,
    /// Wall height requirements
    Freeboard,
    /// Drawdown through the structure and floor elevations
    WaterSurfaceDrop,
    /// Standard-step energy balance
    Backwater,
    /// Pass/fail compliance checks
    DesignChecks,
}

impl EquationCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::SectionGeometry => "Section Geometry",
            EquationCategory::UniformFlow => "Uniform Flow",
            EquationCategory::FlowRegime => "Flow Regime",
            EquationCategory::WidthDesign => "Width Design",
            EquationCategory::Freeboard => "Freeboard",
            EquationCategory::WaterSurfaceDrop => "Water-Surface Drop",
            EquationCategory::Backwater => "Backwater",
            EquationCategory::DesignChecks => "Design Checks",
        }
    }

    /// Order in which a design run uses the category
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::SectionGeometry => 1,
            EquationCategory::UniformFlow => 2,
            EquationCategory::FlowRegime => 3,
            EquationCategory::WidthDesign => 4,
            EquationCategory::Freeboard => 5,
            EquationCategory::WaterSurfaceDrop => 6,
            EquationCategory::Backwater => 7,
            EquationCategory::DesignChecks => 8,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// A symbol appearing in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self {
            symbol,
            description,
            units,
        }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Everything needed to document and audit one formula.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// What the equation computes
    pub description: &'static str,
    /// Plain-text formula
    pub formula: &'static str,
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    /// Assumptions or limits of validity
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Module implementing the equation, relative to `src/`
    pub source_module: &'static str,
    /// Implementing function
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// Hydraulic equations evaluated during an aqueduct design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    // Section geometry
    RectangularGeometry,
    TrapezoidalGeometry,
    UShellCentralAngle,
    UShellArea,
    UShellWettedPerimeter,
    HydraulicRadius,

    // Uniform flow
    ManningDischarge,
    MeanVelocity,

    // Flow regime
    FroudeCriterion,
    CriticalDepth,

    // Width design
    DepthWidthRatio,

    // Freeboard
    DesignFreeboardRectangular,
    DesignFreeboardUShell,
    CheckedFreeboard,

    // Water-surface drop
    AverageFrictionSlope,
    InletDrop,
    FlumeDrop,
    OutletRecovery,
    TotalDrop,
    FloorElevations,

    // Backwater
    EnergyBalance,
    LocalLoss,
    FrictionLoss,

    // Checks
    RiseLimit,
}

impl Equation {
    /// Full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::RectangularGeometry => EquationMetadata {
                name: "Rectangular Section Geometry",
                description: "Wetted area and perimeter of a rectangular channel",
                formula: "A = b*h, P = b + 2h, B = b",
                reference: CodeReference::Chow { chapter: 2 },
                variables: vec![
                    Variable::new("b", "Bottom width", "m"),
                    Variable::new("h", "Depth", "m"),
                    Variable::new("A", "Wetted area", "m²"),
                    Variable::new("P", "Wetted perimeter", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::SectionGeometry,
                source_module: "equations/section.rs",
                source_function: "rectangular_area",
            },
            Equation::TrapezoidalGeometry => EquationMetadata {
                name: "Trapezoidal Section Geometry",
                description: "Wetted area, perimeter and top width of a trapezoidal channel",
                formula: "A = (b + m*h)*h, P = b + 2h*sqrt(1 + m^2), B = b + 2m*h",
                reference: CodeReference::Chow { chapter: 2 },
                variables: vec![
                    Variable::new("b", "Bottom width", "m"),
                    Variable::new("m", "Side slope (horizontal:vertical)", "-"),
                    Variable::new("h", "Depth", "m"),
                    Variable::new("B", "Top width", "m"),
                ],
                assumptions: vec!["Both side slopes equal"],
                category: EquationCategory::SectionGeometry,
                source_module: "equations/section.rs",
                source_function: "trapezoidal_area",
            },
            Equation::UShellCentralAngle => EquationMetadata {
                name: "U-Shell Central Angle",
                description: "Angle subtended at the arc centre by the water surface when the arc is partly full",
                formula: "θ = 2*acos((r - h)/r), h < r",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("θ", "Central angle", "rad"),
                    Variable::new("r", "Invert radius", "m"),
                    Variable::new("h", "Depth", "m"),
                ],
                assumptions: vec!["Only defined while the water surface is inside the arc"],
                category: EquationCategory::SectionGeometry,
                source_module: "equations/section.rs",
                source_function: "ushell_theta",
            },
            Equation::UShellArea => EquationMetadata {
                name: "U-Shell Wetted Area",
                description: "Piecewise area of a semicircular invert with vertical walls",
                formula: "A = (r^2/2)(θ - sin θ) for h < r; A = π*r^2/2 + 2r(h - r) for h ≥ r",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("r", "Invert radius", "m"),
                    Variable::new("h", "Depth", "m"),
                    Variable::new("θ", "Central angle", "rad"),
                ],
                assumptions: vec!["Branches agree at h = r"],
                category: EquationCategory::SectionGeometry,
                source_module: "equations/section.rs",
                source_function: "ushell_area",
            },
            Equation::UShellWettedPerimeter => EquationMetadata {
                name: "U-Shell Wetted Perimeter",
                description: "Arc length plus wetted wall height",
                formula: "P = r*θ for h < r; P = π*r + 2(h - r) for h ≥ r",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("r", "Invert radius", "m"),
                    Variable::new("θ", "Central angle", "rad"),
                ],
                assumptions: vec![],
                category: EquationCategory::SectionGeometry,
                source_module: "equations/section.rs",
                source_function: "ushell_wetted_perimeter",
            },
            Equation::HydraulicRadius => EquationMetadata {
                name: "Hydraulic Radius",
                description: "Wetted area per unit wetted perimeter",
                formula: "R = A / P",
                reference: CodeReference::Chow { chapter: 2 },
                variables: vec![
                    Variable::new("R", "Hydraulic radius", "m"),
                    Variable::new("A", "Wetted area", "m²"),
                    Variable::new("P", "Wetted perimeter", "m"),
                ],
                assumptions: vec!["R = 0 when P = 0"],
                category: EquationCategory::SectionGeometry,
                source_module: "equations/section.rs",
                source_function: "hydraulic_radius",
            },
            Equation::ManningDischarge => EquationMetadata {
                name: "Manning's Equation",
                description: "Uniform-flow discharge; solved for normal depth or section width",
                formula: "Q = (1/n) * A * R^(2/3) * i^(1/2)",
                reference: CodeReference::Chow { chapter: 5 },
                variables: vec![
                    Variable::new("Q", "Discharge", "m³/s"),
                    Variable::new("n", "Manning roughness", "-"),
                    Variable::new("A", "Wetted area", "m²"),
                    Variable::new("R", "Hydraulic radius", "m"),
                    Variable::new("i", "Bed slope", "-"),
                ],
                assumptions: vec!["Steady uniform flow", "Fully rough turbulent regime"],
                category: EquationCategory::UniformFlow,
                source_module: "equations/hydraulics.rs",
                source_function: "manning_discharge",
            },
            Equation::MeanVelocity => EquationMetadata {
                name: "Mean Velocity",
                description: "Continuity",
                formula: "v = Q / A",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("v", "Mean velocity", "m/s"),
                    Variable::new("Q", "Discharge", "m³/s"),
                    Variable::new("A", "Wetted area", "m²"),
                ],
                assumptions: vec![],
                category: EquationCategory::UniformFlow,
                source_module: "equations/hydraulics.rs",
                source_function: "mean_velocity",
            },
            Equation::FroudeCriterion => EquationMetadata {
                name: "Froude Criterion",
                description: "Squared Froude number; below 1 the flow is subcritical",
                formula: "Fr = Q^2 * B / (g * A^3)",
                reference: CodeReference::Chow { chapter: 3 },
                variables: vec![
                    Variable::new("Q", "Discharge", "m³/s"),
                    Variable::new("B", "Top width", "m"),
                    Variable::new("A", "Wetted area", "m²"),
                    Variable::new("g", "Gravitational acceleration", "m/s²"),
                ],
                assumptions: vec!["Hydrostatic pressure distribution"],
                category: EquationCategory::FlowRegime,
                source_module: "equations/hydraulics.rs",
                source_function: "froude_number",
            },
            Equation::CriticalDepth => EquationMetadata {
                name: "Critical Depth",
                description: "Depth of minimum specific energy, found by bisection",
                formula: "1 - Q^2 * B(h_k) / (g * A(h_k)^3) = 0",
                reference: CodeReference::Chow { chapter: 4 },
                variables: vec![
                    Variable::new("h_k", "Critical depth", "m"),
                    Variable::new("Q", "Discharge", "m³/s"),
                ],
                assumptions: vec!["Critical depth lies inside the search bracket"],
                category: EquationCategory::FlowRegime,
                source_module: "calculations/critical_depth.rs",
                source_function: "solve_critical_depth",
            },
            Equation::DepthWidthRatio => EquationMetadata {
                name: "Depth/Width Ratio",
                description: "Depth implied by the permissible ratio while sizing the barrel",
                formula: "h = β*b (rectangular, trapezoidal); h = β*2r (U-shell)",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("β", "Depth/width ratio", "-"),
                    Variable::new("b", "Bottom width", "m"),
                    Variable::new("r", "Invert radius", "m"),
                ],
                assumptions: vec!["β within 0.6-0.8 (rectangular) or 0.7-0.9 (U-shell)"],
                category: EquationCategory::WidthDesign,
                source_module: "calculations/width.rs",
                source_function: "depth_from_ratio",
            },
            Equation::DesignFreeboardRectangular => EquationMetadata {
                name: "Design-Flow Wall Height (Rectangular)",
                description: "Wall height needed at design discharge for rectangular and trapezoidal barrels",
                formula: "H_s = h_s + h_s/12 + 0.05",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("H_s", "Required wall height", "m"),
                    Variable::new("h_s", "Normal depth at design discharge", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::Freeboard,
                source_module: "calculations/freeboard.rs",
                source_function: "design_requirement",
            },
            Equation::DesignFreeboardUShell => EquationMetadata {
                name: "Design-Flow Wall Height (U-Shell)",
                description: "Wall height needed at design discharge for U-shell barrels",
                formula: "H_s = h_s + d/10",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("H_s", "Required wall height", "m"),
                    Variable::new("h_s", "Normal depth at design discharge", "m"),
                    Variable::new("d", "Internal diameter 2r", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::Freeboard,
                source_module: "calculations/freeboard.rs",
                source_function: "design_requirement",
            },
            Equation::CheckedFreeboard => EquationMetadata {
                name: "Checked-Flow Wall Height",
                description: "Wall height needed at checked discharge; the larger requirement governs",
                formula: "H_j = h_j + t + 0.1, H = max(H_s, H_j)",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("H_j", "Required wall height", "m"),
                    Variable::new("h_j", "Normal depth at checked discharge", "m"),
                    Variable::new("t", "Strut height", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::Freeboard,
                source_module: "calculations/freeboard.rs",
                source_function: "checked_requirement",
            },
            Equation::AverageFrictionSlope => EquationMetadata {
                name: "Average Friction Slope",
                description: "Mean of the Manning friction slopes at two sections",
                formula: "J = (Q^2 n^2 / 2) * (1/(A1^2 R1^(4/3)) + 1/(A2^2 R2^(4/3)))",
                reference: CodeReference::Chow { chapter: 10 },
                variables: vec![
                    Variable::new("J", "Friction slope", "-"),
                    Variable::new("n", "Roughness along the reach", "-"),
                    Variable::new("A1, A2", "Wetted areas", "m²"),
                    Variable::new("R1, R2", "Hydraulic radii", "m"),
                ],
                assumptions: vec!["Arithmetic mean of end-section slopes"],
                category: EquationCategory::WaterSurfaceDrop,
                source_module: "equations/hydraulics.rs",
                source_function: "average_friction_slope",
            },
            Equation::InletDrop => EquationMetadata {
                name: "Inlet Water-Surface Drop",
                description: "Drawdown through the inlet transition at design flow",
                formula: "Z1 = (1 + ξ1)(v^2 - v1^2)/(2g) + J12*L1",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("ξ1", "Inlet loss coefficient", "-"),
                    Variable::new("v", "Flume velocity", "m/s"),
                    Variable::new("v1", "Upstream canal velocity", "m/s"),
                    Variable::new("L1", "Inlet length", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::WaterSurfaceDrop,
                source_module: "equations/hydraulics.rs",
                source_function: "inlet_drop",
            },
            Equation::FlumeDrop => EquationMetadata {
                name: "Barrel Water-Surface Drop",
                description: "Uniform-flow fall along the flume",
                formula: "Z2 = i*L",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("i", "Flume slope", "-"),
                    Variable::new("L", "Flume length", "m"),
                ],
                assumptions: vec!["Uniform flow in the barrel"],
                category: EquationCategory::WaterSurfaceDrop,
                source_module: "equations/hydraulics.rs",
                source_function: "flume_drop",
            },
            Equation::OutletRecovery => EquationMetadata {
                name: "Outlet Water-Surface Recovery",
                description: "Rise through the outlet transition as velocity head is regained",
                formula: "Z3 = (1 - ξ2)(v^2 - v2^2)/(2g) - J34*L2",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("ξ2", "Outlet loss coefficient", "-"),
                    Variable::new("v2", "Downstream canal velocity", "m/s"),
                    Variable::new("L2", "Outlet length", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::WaterSurfaceDrop,
                source_module: "equations/hydraulics.rs",
                source_function: "outlet_recovery",
            },
            Equation::TotalDrop => EquationMetadata {
                name: "Total Water-Surface Drop",
                description: "Net fall from upstream to downstream canal",
                formula: "ΔZ = Z1 + Z2 - Z3",
                reference: CANAL_CODE,
                variables: vec![Variable::new("ΔZ", "Total drop", "m")],
                assumptions: vec![],
                category: EquationCategory::WaterSurfaceDrop,
                source_module: "equations/hydraulics.rs",
                source_function: "total_drop",
            },
            Equation::FloorElevations => EquationMetadata {
                name: "Floor Elevations",
                description: "Invert levels from the upstream canal floor and the drawdown terms",
                formula: "N1 = N3 + h1 - Z1 - h, N2 = N1 - i*L, N4 = N2 + h + Z3 - h2",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("N3", "Upstream canal floor", "m"),
                    Variable::new("N1, N2", "Flume inlet and outlet floors", "m"),
                    Variable::new("N4", "Downstream canal floor", "m"),
                ],
                assumptions: vec!["Design-flow normal depths in all three sections"],
                category: EquationCategory::WaterSurfaceDrop,
                source_module: "calculations/floor.rs",
                source_function: "calculate",
            },
            Equation::EnergyBalance => EquationMetadata {
                name: "Reach Energy Balance",
                description: "Standard-step balance between a known downstream and unknown upstream section",
                formula: "z1 + h1 + Q^2/(2g A1^2) + h_s + h_f = z2 + h2 + Q^2/(2g A2^2)",
                reference: CodeReference::Chow { chapter: 10 },
                variables: vec![
                    Variable::new("z1, z2", "Floor elevations", "m"),
                    Variable::new("h1, h2", "Depths", "m"),
                    Variable::new("h_s", "Local loss", "m"),
                    Variable::new("h_f", "Friction loss", "m"),
                ],
                assumptions: vec!["Gradually varied subcritical flow", "Kinetic energy coefficient 1.0"],
                category: EquationCategory::Backwater,
                source_module: "calculations/backwater.rs",
                source_function: "solve_reach",
            },
            Equation::LocalLoss => EquationMetadata {
                name: "Local Loss",
                description: "Transition loss proportional to the change in velocity head",
                formula: "h_s = ξ/(2g) * |Q^2/A1^2 - Q^2/A2^2|",
                reference: CodeReference::Chow { chapter: 10 },
                variables: vec![Variable::new("ξ", "Loss coefficient", "-")],
                assumptions: vec![],
                category: EquationCategory::Backwater,
                source_module: "equations/hydraulics.rs",
                source_function: "local_loss",
            },
            Equation::FrictionLoss => EquationMetadata {
                name: "Friction Loss",
                description: "Boundary friction over a reach",
                formula: "h_f = J*L",
                reference: CodeReference::Chow { chapter: 10 },
                variables: vec![
                    Variable::new("J", "Average friction slope", "-"),
                    Variable::new("L", "Reach length", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::Backwater,
                source_module: "equations/hydraulics.rs",
                source_function: "friction_loss",
            },
            Equation::RiseLimit => EquationMetadata {
                name: "Water-Surface Rise Limit",
                description: "Checked-flow depth upstream may not exceed 1.03 times the canal's normal depth",
                formula: "h0 <= 1.03 * h",
                reference: CANAL_CODE,
                variables: vec![
                    Variable::new("h0", "Depth from the backwater profile", "m"),
                    Variable::new("h", "Normal depth at checked discharge", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::DesignChecks,
                source_module: "calculations/rise_check.rs",
                source_function: "RiseCheck::evaluate",
            },
        }
    }

    /// All equations in a category, in registry order
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Every category, sorted
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            SectionGeometry,
            UniformFlow,
            FlowRegime,
            WidthDesign,
            Freeboard,
            WaterSurfaceDrop,
            Backwater,
            DesignChecks,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// Every registered equation
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::RectangularGeometry,
    Equation::TrapezoidalGeometry,
    Equation::UShellCentralAngle,
    Equation::UShellArea,
    Equation::UShellWettedPerimeter,
    Equation::HydraulicRadius,
    Equation::ManningDischarge,
    Equation::MeanVelocity,
    Equation::FroudeCriterion,
    Equation::CriticalDepth,
    Equation::DepthWidthRatio,
    Equation::DesignFreeboardRectangular,
    Equation::DesignFreeboardUShell,
    Equation::CheckedFreeboard,
    Equation::AverageFrictionSlope,
    Equation::InletDrop,
    Equation::FlumeDrop,
    Equation::OutletRecovery,
    Equation::TotalDrop,
    Equation::FloorElevations,
    Equation::EnergyBalance,
    Equation::LocalLoss,
    Equation::FrictionLoss,
    Equation::RiseLimit,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// One use of an equation during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    pub equation: Equation,
    /// Where it was applied (e.g. "Outlet transition, Q = 24")
    pub context: String,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
        }
    }
}

/// Collects equation usage during a design run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Equations used, first use order, without repeats
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Unique equations grouped by category, categories sorted
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    pub fn merge(&mut self, other: EquationTracker) {
        self.usages.extend(other.usages);
    }
}

// ============================================================================
// Markdown Generation
// ============================================================================

/// Render the complete equation reference as markdown.
///
/// Written to `hydro_core/src/equations/EQUATIONS.md` by `cargo run --bin gen-equations`.
///
/// ```rust
/// use hydro_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Aqueduct Hydraulics Equations Reference"));
/// assert!(markdown.contains("## Backwater"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Aqueduct Hydraulics Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

Formulas used to size an aqueduct flume, set its wall height and floor
levels, and trace the backwater profile at checked discharge.

## Conventions

| Quantity | Convention |
|----------|------------|
| Units | SI: m, m², m³/s, m/s |
| Elevations | Metres above datum, floor (invert) levels |
| Bed slope i | Positive when the invert falls downstream |
| Froude criterion | Fr = Q²B/(gA³), subcritical below 1 |
| Profile direction | Solved from the downstream canal upstream |

---

"#,
    );

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {assumption}\n"));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}
