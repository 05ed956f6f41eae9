//! # Calculation Report Trace
//!
//! A design run records each computed quantity as a [`ReportEntry`]: its
//! symbol, the formula that produced it, the value, units, and where in the
//! structure it applies. Document builders consume the entries in order;
//! nothing here renders a document.
//!
//! Entries recorded through [`ReportTrace::record`] also log the equation in
//! the trace's [`EquationTracker`], so a report can list every formula used.
//!
//! ```rust
//! use hydro_core::equations::Equation;
//! use hydro_core::report::ReportTrace;
//!
//! let mut trace = ReportTrace::new();
//! trace.record(Equation::FlumeDrop, "Z2", 0.1, "m", "Flume");
//! assert_eq!(trace.entries()[0].formula, "Z2 = i*L");
//! assert_eq!(trace.equations().usages().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{Equation, EquationTracker};

/// One computed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Symbol, e.g. "h1" or "Z3"
    pub symbol: String,
    /// Formula text
    pub formula: String,
    pub value: f64,
    pub units: String,
    /// Where it applies, e.g. "Inlet transition, Q = 24"
    pub context: String,
}

/// Ordered collection of report entries plus the equations they used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportTrace {
    entries: Vec<ReportEntry>,
    equations: EquationTracker,
}

impl ReportTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value produced by a registered equation.
    pub fn record(
        &mut self,
        equation: Equation,
        symbol: impl Into<String>,
        value: f64,
        units: impl Into<String>,
        context: impl Into<String>,
    ) {
        let context = context.into();
        self.equations.record(equation, context.clone());
        self.push(symbol, equation.metadata().formula, value, units, context);
    }

    /// Record a value with a free-form formula (inputs, chosen values).
    pub fn push(
        &mut self,
        symbol: impl Into<String>,
        formula: impl Into<String>,
        value: f64,
        units: impl Into<String>,
        context: impl Into<String>,
    ) {
        self.entries.push(ReportEntry {
            symbol: symbol.into(),
            formula: formula.into(),
            value,
            units: units.into(),
            context: context.into(),
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn equations(&self) -> &EquationTracker {
        &self.equations
    }

    /// First entry with this symbol whose context starts with `context`
    pub fn find(&self, symbol: &str, context: &str) -> Option<&ReportEntry> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol && e.context.starts_with(context))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text table, one line per entry
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            out.push_str(&format!(
                "{:<40} {:<8} = {:>12.4} {:<5} {}\n",
                e.context, e.symbol, e.value, e.units, e.formula
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_equation() {
        let mut trace = ReportTrace::new();
        trace.record(Equation::ManningDischarge, "h", 3.11, "m", "Flume, Q = 20");
        trace.push("N3", "given", 255.0, "m", "Upstream canal");

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.equations().unique_equations(), vec![Equation::ManningDischarge]);
        assert_eq!(trace.entries()[1].formula, "given");
    }

    #[test]
    fn test_find() {
        let mut trace = ReportTrace::new();
        trace.push("h2", "x", 1.0, "m", "Outlet transition, Q = 20");
        trace.push("h2", "x", 2.0, "m", "Outlet transition, Q = 24");
        assert_eq!(trace.find("h2", "Outlet transition, Q = 24").map(|e| e.value), Some(2.0));
        assert!(trace.find("h3", "Outlet").is_none());
    }

    #[test]
    fn test_text_and_json() {
        let mut trace = ReportTrace::new();
        trace.record(Equation::TotalDrop, "ΔZ", 0.1984, "m", "Structure");
        assert!(trace.to_text().contains("0.1984"));

        let json = serde_json::to_string(&trace).unwrap();
        let back: ReportTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries(), trace.entries());
    }
}
