//! Array-usage analysis.
//!
//! Arrays whose size is only known at runtime, and item updates through a
//! runtime index, demand full classical computation.

use qirin_hir::{Callable, ExprKind, RuntimeCapability, Statement, StatementKind, TypedExpr};

use crate::diagnostics::DiagnosticCode;
use crate::visitor::{self, Visitor};

use super::Pattern;

pub fn analyze(callable: &Callable) -> Vec<Pattern> {
    let mut analyzer = ArrayAnalyzer {
        patterns: Vec::new(),
    };
    analyzer.visit_callable(callable);
    analyzer.patterns
}

struct ArrayAnalyzer {
    patterns: Vec<Pattern>,
}

impl Visitor for ArrayAnalyzer {
    fn visit_statement(&mut self, statement: &Statement) {
        if let StatementKind::SetUpdate { index, .. } = &statement.kind
            && !is_static_index(index)
        {
            self.patterns.push(Pattern::reported(
                RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY,
                DiagnosticCode::DynamicArrayUpdate,
                Vec::new(),
                statement.range.unwrap_or_default(),
            ));
        }
        visitor::walk_statement(self, statement);
    }

    fn visit_expr(&mut self, expr: &TypedExpr) {
        match &expr.kind {
            ExprKind::SizedArray { size, .. } if !is_static_index(size) => {
                self.patterns.push(Pattern::reported(
                    RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY,
                    DiagnosticCode::DynamicallySizedArray,
                    Vec::new(),
                    expr.range.unwrap_or_default(),
                ));
            }
            ExprKind::CopyAndUpdate { index, .. } if !is_static_index(index) => {
                self.patterns.push(Pattern::reported(
                    RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY,
                    DiagnosticCode::DynamicArrayUpdate,
                    Vec::new(),
                    expr.range.unwrap_or_default(),
                ));
            }
            _ => {}
        }
        visitor::walk_expr(self, expr);
    }
}

fn is_static_index(expr: &TypedExpr) -> bool {
    match &expr.kind {
        ExprKind::IntLit(_) => true,
        ExprKind::UnOp { operand, .. } => is_static_index(operand),
        _ => false,
    }
}
