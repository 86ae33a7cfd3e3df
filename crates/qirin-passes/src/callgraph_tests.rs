use qirin_hir::{ExprKind, QualifiedName, TypedExpr};

use crate::callgraph::{CallGraph, CallKind};
use crate::test_fixtures::{call_stmt, expr_stmt, operation, single_namespace};

fn name(local: &str) -> QualifiedName {
    QualifiedName::new("Sample", local)
}

#[test]
fn direct_dependencies_follow_mention_order() {
    let c = operation("Sample", "C", vec![]);
    let b = operation("Sample", "B", vec![]);
    let a = operation("Sample", "A", vec![call_stmt(&b), call_stmt(&c), call_stmt(&b)]);
    let graph = CallGraph::build(&single_namespace(vec![a, b, c]));

    let callees: Vec<_> = graph
        .direct_dependencies(&name("A"))
        .iter()
        .map(|site| site.callee.name.clone())
        .collect();
    assert_eq!(callees, ["B", "C", "B"]);

    let distinct: Vec<_> = graph
        .direct_callees(&name("A"))
        .into_iter()
        .map(|callee| callee.name.clone())
        .collect();
    assert_eq!(distinct, ["B", "C"]);
}

#[test]
fn leaf_callables_have_no_dependencies() {
    let a = operation("Sample", "A", vec![]);
    let graph = CallGraph::build(&single_namespace(vec![a]));

    assert!(graph.direct_dependencies(&name("A")).is_empty());
    assert!(graph.cycles().is_empty());
}

#[test]
fn functor_applications_record_their_call_kind() {
    let b = operation("Sample", "B", vec![]);
    let adjoint_call = TypedExpr::new(
        ExprKind::Adjoint(Box::new(TypedExpr::global(
            name("B"),
            b.value_type(),
        ))),
        b.value_type(),
    );
    let a = operation("Sample", "A", vec![expr_stmt(adjoint_call)]);
    let graph = CallGraph::build(&single_namespace(vec![a, b]));

    let sites = graph.direct_dependencies(&name("A"));
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].kind, CallKind::Adjoint);
    assert_eq!(sites[0].callee, name("B"));
}

#[test]
fn two_cycle_is_enumerated_once() {
    let b_stub = operation("Sample", "B", vec![]);
    let a = operation("Sample", "A", vec![call_stmt(&b_stub)]);
    let a_stub = operation("Sample", "A", vec![]);
    let b = operation("Sample", "B", vec![call_stmt(&a_stub)]);
    let graph = CallGraph::build(&single_namespace(vec![a, b]));

    let cycles = graph.cycles();
    assert_eq!(cycles.len(), 1);
    let mut members: Vec<_> = cycles[0].iter().map(|n| n.name.clone()).collect();
    members.sort();
    assert_eq!(members, ["A", "B"]);
}

#[test]
fn self_call_is_a_cycle() {
    let stub = operation("Sample", "Loop", vec![]);
    let looping = operation("Sample", "Loop", vec![call_stmt(&stub)]);
    let graph = CallGraph::build(&single_namespace(vec![looping]));

    let cycles = graph.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0], [name("Loop")]);
}

#[test]
fn non_recursive_chain_has_no_cycles() {
    let c = operation("Sample", "C", vec![]);
    let b = operation("Sample", "B", vec![call_stmt(&c)]);
    let a = operation("Sample", "A", vec![call_stmt(&b)]);
    let graph = CallGraph::build(&single_namespace(vec![a, b, c]));

    assert!(graph.cycles().is_empty());
}

#[test]
fn unknown_callees_do_not_break_cycle_detection() {
    let ghost = operation("Sample", "Ghost", vec![]);
    let a = operation("Sample", "A", vec![call_stmt(&ghost)]);
    // Ghost is mentioned but never declared.
    let graph = CallGraph::build(&single_namespace(vec![a]));

    assert_eq!(graph.direct_dependencies(&name("A")).len(), 1);
    assert!(graph.cycles().is_empty());
}

#[test]
fn grouped_dependencies_key_on_kind() {
    let b = operation("Sample", "B", vec![]);
    let adjoint_call = TypedExpr::new(
        ExprKind::Adjoint(Box::new(TypedExpr::global(
            name("B"),
            b.value_type(),
        ))),
        b.value_type(),
    );
    let a = operation(
        "Sample",
        "A",
        vec![call_stmt(&b), expr_stmt(adjoint_call), call_stmt(&b)],
    );
    let graph = CallGraph::build(&single_namespace(vec![a, b]));

    let groups = graph.grouped_dependencies(&name("A"));
    assert_eq!(groups.len(), 2);
    let direct_key = (name("B"), CallKind::Direct, Vec::new());
    assert_eq!(groups[&direct_key].len(), 2);
}
