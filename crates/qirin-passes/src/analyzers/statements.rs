//! Statement-kind analysis.
//!
//! Flags statement forms operations cannot run on base targets: arbitrary
//! `while` loops take full computation, repeat-until loops take measurement
//! feedback. Functions are purely classical and keep base here.

use qirin_hir::{Callable, CallableKind, RuntimeCapability, Statement, StatementKind};

use crate::diagnostics::DiagnosticCode;
use crate::visitor::{self, Visitor};

use super::Pattern;

pub fn analyze(callable: &Callable) -> Vec<Pattern> {
    if callable.kind != CallableKind::Operation {
        return Vec::new();
    }
    let mut analyzer = StatementAnalyzer {
        patterns: Vec::new(),
    };
    analyzer.visit_callable(callable);
    analyzer.patterns
}

struct StatementAnalyzer {
    patterns: Vec<Pattern>,
}

impl Visitor for StatementAnalyzer {
    fn visit_statement(&mut self, statement: &Statement) {
        let range = statement.range.unwrap_or_default();
        match &statement.kind {
            StatementKind::While { .. } => self.patterns.push(Pattern::reported(
                RuntimeCapability::FULL_COMPUTATION,
                DiagnosticCode::UnsupportedClassicalCapability,
                vec!["a while loop in an operation".to_string()],
                range,
            )),
            StatementKind::Repeat { .. } => self.patterns.push(Pattern::reported(
                RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK,
                DiagnosticCode::UnsupportedClassicalCapability,
                vec!["a repeat-until loop".to_string()],
                range,
            )),
            _ => {}
        }
        visitor::walk_statement(self, statement);
    }
}
