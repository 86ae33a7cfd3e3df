//! The machine-readable diagnostic form.
//!
//! Positions are 1-based on the wire and 0-based everywhere else in the
//! workspace.

use serde::{Deserialize, Serialize};

use qirin_hir::Range;

use super::code::{DiagnosticCode, Severity};
use super::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRange {
    pub start: WirePosition,
    pub end: WirePosition,
}

impl WireRange {
    pub fn from_range(range: Range) -> Self {
        let shifted = range.one_based();
        Self {
            start: WirePosition {
                line: shifted.start.line,
                col: shifted.start.column,
            },
            end: WirePosition {
                line: shifted.end.line,
                col: shifted.end.column,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDiagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub arguments: Vec<String>,
    pub range: WireRange,
}

impl WireDiagnostic {
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity,
            code: diagnostic.code,
            arguments: diagnostic.arguments.clone(),
            range: WireRange::from_range(diagnostic.range),
        }
    }
}
