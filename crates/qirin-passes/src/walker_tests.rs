use qirin_hir::{
    BinaryOp, ExprKind, ResolvedType, Statement, StatementKind, TypedExpr,
};

use crate::test_fixtures::{expr_stmt, function, single_namespace};
use crate::transform::{Transformer, rewrite_expr};
use crate::visitor::{self, Visitor};
use crate::{PassError, Result};

struct IdentityTransformer;

impl Transformer for IdentityTransformer {}

#[test]
fn default_transformer_is_identity() {
    let sum = TypedExpr::bin_op(
        BinaryOp::Add,
        TypedExpr::int_lit(1),
        TypedExpr::int_lit(2),
        ResolvedType::Int,
    );
    let program = single_namespace(vec![function(
        "Sample",
        "Noop",
        vec![
            expr_stmt(sum),
            Statement::new(StatementKind::Return(TypedExpr::unit())),
        ],
    )]);

    let rewritten = IdentityTransformer.on_program(program.clone()).unwrap();
    assert_eq!(rewritten, program);
}

struct LiteralCollector {
    literals: Vec<i64>,
}

impl Visitor for LiteralCollector {
    fn visit_expr(&mut self, expr: &TypedExpr) {
        if let ExprKind::IntLit(value) = expr.kind {
            self.literals.push(value);
        }
        visitor::walk_expr(self, expr);
    }
}

#[test]
fn visitor_sees_children_in_source_order() {
    let expr = TypedExpr::bin_op(
        BinaryOp::Add,
        TypedExpr::bin_op(
            BinaryOp::Mul,
            TypedExpr::int_lit(1),
            TypedExpr::int_lit(2),
            ResolvedType::Int,
        ),
        TypedExpr::int_lit(3),
        ResolvedType::Int,
    );
    let program = single_namespace(vec![function("Sample", "Main", vec![expr_stmt(expr)])]);

    let mut collector = LiteralCollector {
        literals: Vec::new(),
    };
    collector.visit_program(&program);

    assert_eq!(collector.literals, [1, 2, 3]);
}

/// Replaces every integer literal with `true`, changing types.
struct TypeBreaker;

impl Transformer for TypeBreaker {
    fn on_expr(&mut self, expr: TypedExpr) -> Result<TypedExpr> {
        if matches!(expr.kind, ExprKind::IntLit(_)) {
            return Ok(TypedExpr::bool_lit(true));
        }
        rewrite_expr(self, expr)
    }
}

#[test]
fn type_changing_rewrite_fails_the_pass() {
    let program = single_namespace(vec![function(
        "Sample",
        "Main",
        vec![expr_stmt(TypedExpr::int_lit(7))],
    )]);

    let error = TypeBreaker.on_program(program).unwrap_err();
    assert!(matches!(error, PassError::TypeInvariant { .. }));
}

/// The same rewrite is fine for a transformer that opts out of type
/// preservation.
struct UncheckedTypeBreaker;

impl Transformer for UncheckedTypeBreaker {
    fn requires_type_preservation(&self) -> bool {
        false
    }

    fn on_expr(&mut self, expr: TypedExpr) -> Result<TypedExpr> {
        if matches!(expr.kind, ExprKind::IntLit(_)) {
            return Ok(TypedExpr::bool_lit(true));
        }
        rewrite_expr(self, expr)
    }
}

#[test]
fn type_preservation_can_be_opted_out() {
    let program = single_namespace(vec![function(
        "Sample",
        "Main",
        vec![expr_stmt(TypedExpr::int_lit(7))],
    )]);

    let rewritten = UncheckedTypeBreaker.on_program(program).unwrap();
    let callable = rewritten.callables().next().unwrap();
    let body = callable.body().unwrap();
    let StatementKind::Expr(expr) = &body.statements[0].kind else {
        panic!("expected an expression statement");
    };
    assert_eq!(expr.kind, ExprKind::BoolLit(true));
}
