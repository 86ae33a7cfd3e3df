//! Type-usage analysis.
//!
//! Heavy classical types inside operation bodies (BigInt, Double, String)
//! demand full classical computation from the target.

use qirin_hir::{Callable, CallableKind, ResolvedType, RuntimeCapability, TypedExpr};

use crate::diagnostics::DiagnosticCode;
use crate::visitor::{self, Visitor};

use super::Pattern;

pub fn analyze(callable: &Callable) -> Vec<Pattern> {
    if callable.kind != CallableKind::Operation {
        return Vec::new();
    }
    let mut analyzer = TypeAnalyzer {
        suppressed: false,
        patterns: Vec::new(),
    };

    // Parameter types count as uses too.
    for param in callable.input.params() {
        if let Some(label) = heavy_type(&param.ty) {
            analyzer.patterns.push(Pattern::reported(
                RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY,
                DiagnosticCode::UnsupportedClassicalCapability,
                vec![format!("a parameter of type {label}")],
                param.range.or(callable.range).unwrap_or_default(),
            ));
        }
    }

    analyzer.visit_callable(callable);
    analyzer.patterns
}

struct TypeAnalyzer {
    /// Set while inside an expression already flagged; children of a heavy
    /// expression share its type and would only repeat the pattern.
    suppressed: bool,
    patterns: Vec<Pattern>,
}

impl Visitor for TypeAnalyzer {
    fn visit_expr(&mut self, expr: &TypedExpr) {
        if self.suppressed {
            visitor::walk_expr(self, expr);
            return;
        }

        if let Some(label) = heavy_type(&expr.ty) {
            self.patterns.push(Pattern::reported(
                RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY,
                DiagnosticCode::UnsupportedClassicalCapability,
                vec![format!("a value of type {label}")],
                expr.range.unwrap_or_default(),
            ));
            self.suppressed = true;
            visitor::walk_expr(self, expr);
            self.suppressed = false;
        } else {
            visitor::walk_expr(self, expr);
        }
    }
}

fn heavy_type(ty: &ResolvedType) -> Option<&'static str> {
    match ty {
        ResolvedType::BigInt => Some("BigInt"),
        ResolvedType::Double => Some("Double"),
        ResolvedType::String => Some("String"),
        _ => None,
    }
}
