//! Measurement-result usage analysis.
//!
//! Comparing `Result` values is the dividing line between targets: inside
//! the condition of an `if` in an operation it takes measurement feedback;
//! anywhere else it takes full computation. Escaping a result-conditioned
//! block through `return`, or mutating state declared outside it, also
//! takes full computation.

use qirin_hir::{
    BinaryOp, Callable, CallableKind, ExprKind, Range, ResolvedType, RuntimeCapability, Scope,
    Statement, StatementKind, TypedExpr,
};

use crate::diagnostics::DiagnosticCode;
use crate::visitor::{self, Visitor};

use super::Pattern;

pub fn analyze(callable: &Callable) -> Vec<Pattern> {
    let mut analyzer = ResultAnalyzer {
        in_operation: callable.kind == CallableKind::Operation,
        in_condition: false,
        conditioned_depth: 0,
        block_locals: Vec::new(),
        patterns: Vec::new(),
    };
    analyzer.visit_callable(callable);
    analyzer.patterns
}

struct ResultAnalyzer {
    in_operation: bool,
    /// Inside the condition expression of an `if` statement.
    in_condition: bool,
    /// Nesting depth of blocks guarded by a result comparison.
    conditioned_depth: usize,
    /// Locals declared within the innermost conditioned block; `set` to
    /// anything else escapes the block.
    block_locals: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ResultAnalyzer {
    fn flag_comparison(&mut self, range: Range) {
        if self.in_condition && self.in_operation {
            self.patterns.push(Pattern::reported(
                RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK,
                DiagnosticCode::UnsupportedResultComparison,
                Vec::new(),
                range,
            ));
        } else {
            self.patterns.push(Pattern::reported(
                RuntimeCapability::FULL_COMPUTATION,
                DiagnosticCode::ResultComparisonNotInOperationIf,
                Vec::new(),
                range,
            ));
        }
    }

    fn visit_conditioned_scope(&mut self, scope: &Scope) {
        let locals_before = self.block_locals.len();
        self.conditioned_depth += 1;
        self.visit_scope(scope);
        self.conditioned_depth -= 1;
        self.block_locals.truncate(locals_before);
    }
}

impl Visitor for ResultAnalyzer {
    fn visit_scope(&mut self, scope: &Scope) {
        for statement in &scope.statements {
            self.visit_statement(statement);
            if self.conditioned_depth > 0 {
                self.block_locals.extend(
                    statement
                        .declared_symbols()
                        .into_iter()
                        .map(|symbol| symbol.name),
                );
            }
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        let range = statement.range.unwrap_or_default();
        match &statement.kind {
            StatementKind::If {
                branches,
                else_scope,
            } => {
                let mut conditioned = false;
                for (condition, scope) in branches {
                    self.in_condition = true;
                    self.visit_expr(condition);
                    self.in_condition = false;

                    if self.in_operation && compares_results(condition) {
                        conditioned = true;
                    }
                    if conditioned {
                        self.visit_conditioned_scope(scope);
                    } else {
                        self.visit_scope(scope);
                    }
                }
                if let Some(scope) = else_scope {
                    if conditioned {
                        self.visit_conditioned_scope(scope);
                    } else {
                        self.visit_scope(scope);
                    }
                }
            }
            StatementKind::Return(value) => {
                if self.conditioned_depth > 0 {
                    self.patterns.push(Pattern::reported(
                        RuntimeCapability::FULL_COMPUTATION,
                        DiagnosticCode::ReturnInResultConditionedBlock,
                        Vec::new(),
                        range,
                    ));
                }
                self.visit_expr(value);
            }
            StatementKind::Set { name, .. } | StatementKind::SetUpdate { name, .. } => {
                if self.conditioned_depth > 0 && !self.block_locals.iter().any(|l| l == name) {
                    self.patterns.push(Pattern::reported(
                        RuntimeCapability::FULL_COMPUTATION,
                        DiagnosticCode::SetInResultConditionedBlock,
                        vec![name.clone()],
                        range,
                    ));
                }
                visitor::walk_statement(self, statement);
            }
            _ => visitor::walk_statement(self, statement),
        }
    }

    fn visit_expr(&mut self, expr: &TypedExpr) {
        if let ExprKind::BinOp { op, lhs, .. } = &expr.kind
            && op.is_comparison()
            && lhs.ty == ResolvedType::Result
        {
            self.flag_comparison(expr.range.unwrap_or_default());
        }
        visitor::walk_expr(self, expr);
    }
}

/// Whether an expression contains an equality test over `Result` values.
pub(crate) fn compares_results(expr: &TypedExpr) -> bool {
    if let ExprKind::BinOp { op, lhs, .. } = &expr.kind
        && matches!(op, BinaryOp::Eq | BinaryOp::Neq)
        && lhs.ty == ResolvedType::Result
    {
        return true;
    }
    let mut found = false;
    expr.for_each_child(&mut |child| {
        if compares_results(child) {
            found = true;
        }
    });
    found
}
