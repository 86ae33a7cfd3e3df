use qirin_hir::{
    BinaryOp, BindingPattern, CallableKind, ParamPattern, ResolvedType, ResultValue,
    RuntimeCapability, Scope, Statement, StatementKind, TypedExpr,
};

use crate::diagnostics::DiagnosticCode;
use crate::test_fixtures::{callable, expr_stmt, function, no_params, operation};

use super::{Pattern, analyze_callable, arrays, result, source_capability, statements, types};

fn result_comparison() -> TypedExpr {
    TypedExpr::equality(
        TypedExpr::result_lit(ResultValue::One),
        TypedExpr::result_lit(ResultValue::Zero),
    )
}

fn if_stmt(condition: TypedExpr, then: Vec<Statement>) -> Statement {
    Statement::new(StatementKind::If {
        branches: vec![(condition, Scope::new(then))],
        else_scope: None,
    })
}

fn capabilities(patterns: &[Pattern]) -> Vec<RuntimeCapability> {
    patterns.iter().map(|p| p.capability).collect()
}

#[test]
fn comparison_in_operation_if_needs_measurement_feedback() {
    let m = operation("Sample", "M", vec![if_stmt(result_comparison(), vec![])]);

    let patterns = result::analyze(&m);

    assert_eq!(
        capabilities(&patterns),
        [RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK]
    );
    assert_eq!(
        patterns[0].diagnostic.as_ref().unwrap().code,
        DiagnosticCode::UnsupportedResultComparison
    );
}

#[test]
fn comparison_outside_a_condition_needs_full_computation() {
    let m = operation(
        "Sample",
        "M",
        vec![Statement::new(StatementKind::Let {
            pattern: BindingPattern::name("same"),
            value: result_comparison(),
        })],
    );

    let patterns = result::analyze(&m);

    assert_eq!(capabilities(&patterns), [RuntimeCapability::FULL_COMPUTATION]);
    assert_eq!(
        patterns[0].diagnostic.as_ref().unwrap().code,
        DiagnosticCode::ResultComparisonNotInOperationIf
    );
}

#[test]
fn comparison_in_a_function_needs_full_computation() {
    let f = callable(
        CallableKind::Function,
        "Sample",
        "Check",
        no_params(),
        ResolvedType::Bool,
        vec![Statement::new(StatementKind::Return(result_comparison()))],
    );

    let patterns = result::analyze(&f);

    assert_eq!(capabilities(&patterns), [RuntimeCapability::FULL_COMPUTATION]);
}

#[test]
fn return_inside_a_result_conditioned_block_is_flagged() {
    let m = callable(
        CallableKind::Operation,
        "Sample",
        "M",
        no_params(),
        ResolvedType::Int,
        vec![
            if_stmt(
                result_comparison(),
                vec![Statement::new(StatementKind::Return(TypedExpr::int_lit(1)))],
            ),
            Statement::new(StatementKind::Return(TypedExpr::int_lit(0))),
        ],
    );

    let patterns = result::analyze(&m);

    // One for the comparison, one for the conditioned return; the return
    // outside the block is fine.
    assert_eq!(
        capabilities(&patterns),
        [
            RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK,
            RuntimeCapability::FULL_COMPUTATION,
        ]
    );
    assert_eq!(
        patterns[1].diagnostic.as_ref().unwrap().code,
        DiagnosticCode::ReturnInResultConditionedBlock
    );
}

#[test]
fn set_of_an_outer_local_inside_a_conditioned_block_is_flagged() {
    let m = operation(
        "Sample",
        "M",
        vec![
            Statement::new(StatementKind::Mutable {
                pattern: BindingPattern::name("count"),
                value: TypedExpr::int_lit(0),
            }),
            if_stmt(
                result_comparison(),
                vec![Statement::new(StatementKind::Set {
                    name: "count".to_string(),
                    value: TypedExpr::int_lit(1),
                })],
            ),
        ],
    );

    let patterns = result::analyze(&m);
    let codes: Vec<_> = patterns
        .iter()
        .filter_map(|p| p.diagnostic.as_ref().map(|d| d.code))
        .collect();

    assert!(codes.contains(&DiagnosticCode::SetInResultConditionedBlock));
}

#[test]
fn set_of_a_block_local_is_not_flagged() {
    let m = operation(
        "Sample",
        "M",
        vec![if_stmt(
            result_comparison(),
            vec![
                Statement::new(StatementKind::Mutable {
                    pattern: BindingPattern::name("tmp"),
                    value: TypedExpr::int_lit(0),
                }),
                Statement::new(StatementKind::Set {
                    name: "tmp".to_string(),
                    value: TypedExpr::int_lit(1),
                }),
            ],
        )],
    );

    let patterns = result::analyze(&m);
    let codes: Vec<_> = patterns
        .iter()
        .filter_map(|p| p.diagnostic.as_ref().map(|d| d.code))
        .collect();

    assert!(!codes.contains(&DiagnosticCode::SetInResultConditionedBlock));
}

#[test]
fn while_loops_in_operations_need_full_computation() {
    let m = operation(
        "Sample",
        "M",
        vec![Statement::new(StatementKind::While {
            condition: TypedExpr::bool_lit(true),
            body: Scope::default(),
        })],
    );

    assert_eq!(
        capabilities(&statements::analyze(&m)),
        [RuntimeCapability::FULL_COMPUTATION]
    );
}

#[test]
fn repeat_loops_need_measurement_feedback() {
    let m = operation(
        "Sample",
        "M",
        vec![Statement::new(StatementKind::Repeat {
            body: Scope::default(),
            until: TypedExpr::bool_lit(true),
            fixup: None,
        })],
    );

    assert_eq!(
        capabilities(&statements::analyze(&m)),
        [RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK]
    );
}

#[test]
fn while_loops_in_functions_stay_base() {
    let f = function(
        "Sample",
        "F",
        vec![Statement::new(StatementKind::While {
            condition: TypedExpr::bool_lit(true),
            body: Scope::default(),
        })],
    );

    assert!(statements::analyze(&f).is_empty());
    assert_eq!(source_capability(&f), RuntimeCapability::BASE);
}

#[test]
fn doubles_in_operations_need_classical_computation() {
    let m = operation("Sample", "M", vec![expr_stmt(TypedExpr::double_lit(0.5))]);

    let patterns = types::analyze(&m);

    assert_eq!(
        capabilities(&patterns),
        [RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY]
    );
}

#[test]
fn doubles_in_functions_are_unrestricted() {
    let f = function("Sample", "F", vec![expr_stmt(TypedExpr::double_lit(0.5))]);

    assert!(types::analyze(&f).is_empty());
}

#[test]
fn heavy_parameter_types_are_flagged_once() {
    let m = callable(
        CallableKind::Operation,
        "Sample",
        "M",
        ParamPattern::item("angle", ResolvedType::Double),
        ResolvedType::Unit,
        vec![],
    );

    let patterns = types::analyze(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(
        patterns[0].capability,
        RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY
    );
}

#[test]
fn nested_heavy_expressions_are_not_double_counted() {
    let sum = TypedExpr::bin_op(
        BinaryOp::Add,
        TypedExpr::double_lit(1.0),
        TypedExpr::double_lit(2.0),
        ResolvedType::Double,
    );
    let m = operation("Sample", "M", vec![expr_stmt(sum)]);

    assert_eq!(types::analyze(&m).len(), 1);
}

#[test]
fn dynamic_array_sizes_are_flagged() {
    let sized = TypedExpr::new(
        qirin_hir::ExprKind::SizedArray {
            value: Box::new(TypedExpr::int_lit(0)),
            size: Box::new(TypedExpr::local("n", ResolvedType::Int)),
        },
        ResolvedType::array(ResolvedType::Int),
    );
    let m = callable(
        CallableKind::Operation,
        "Sample",
        "M",
        ParamPattern::item("n", ResolvedType::Int),
        ResolvedType::Unit,
        vec![expr_stmt(sized)],
    );

    let patterns = arrays::analyze(&m);
    assert_eq!(
        capabilities(&patterns),
        [RuntimeCapability::BASIC_QUANTUM_FUNCTIONALITY]
    );
    assert_eq!(
        patterns[0].diagnostic.as_ref().unwrap().code,
        DiagnosticCode::DynamicallySizedArray
    );
}

#[test]
fn literal_array_sizes_stay_base() {
    let sized = TypedExpr::new(
        qirin_hir::ExprKind::SizedArray {
            value: Box::new(TypedExpr::int_lit(0)),
            size: Box::new(TypedExpr::int_lit(4)),
        },
        ResolvedType::array(ResolvedType::Int),
    );
    let m = operation("Sample", "M", vec![expr_stmt(sized)]);

    assert!(arrays::analyze(&m).is_empty());
}

#[test]
fn dynamic_index_updates_are_flagged() {
    let m = callable(
        CallableKind::Operation,
        "Sample",
        "M",
        ParamPattern::item("i", ResolvedType::Int),
        ResolvedType::Unit,
        vec![Statement::new(StatementKind::SetUpdate {
            name: "xs".to_string(),
            index: TypedExpr::local("i", ResolvedType::Int),
            value: TypedExpr::int_lit(0),
        })],
    );

    let patterns = arrays::analyze(&m);
    assert_eq!(
        patterns[0].diagnostic.as_ref().unwrap().code,
        DiagnosticCode::DynamicArrayUpdate
    );
}

#[test]
fn source_capability_joins_all_analyzers() {
    // Result comparison in an if (Controlled+Full) joined with a double
    // (Opaque+Full) stays at measurement feedback.
    let m = operation(
        "Sample",
        "M",
        vec![
            if_stmt(result_comparison(), vec![]),
            expr_stmt(TypedExpr::double_lit(0.5)),
        ],
    );

    assert_eq!(
        source_capability(&m),
        RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK
    );
}

#[test]
fn empty_bodies_are_base() {
    let m = operation("Sample", "M", vec![]);

    assert!(analyze_callable(&m).is_empty());
    assert_eq!(source_capability(&m), RuntimeCapability::BASE);
}

#[test]
fn diagnose_respects_the_target() {
    let m = operation("Sample", "M", vec![if_stmt(result_comparison(), vec![])]);
    let pattern = &result::analyze(&m)[0];

    assert!(pattern.diagnose(RuntimeCapability::BASE).is_some());
    assert!(
        pattern
            .diagnose(RuntimeCapability::BASIC_MEASUREMENT_FEEDBACK)
            .is_none()
    );
    assert!(
        pattern
            .diagnose(RuntimeCapability::FULL_COMPUTATION)
            .is_none()
    );

    let diagnostic = pattern.diagnose(RuntimeCapability::BASE).unwrap();
    assert_eq!(diagnostic.arguments[0], "BasicMeasurementFeedback");
}
