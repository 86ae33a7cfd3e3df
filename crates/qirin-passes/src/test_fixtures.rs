//! Shared builders for pass tests.

use qirin_hir::{
    Access, Callable, CallableKind, Namespace, NamespaceElement, ParamPattern, Program,
    QualifiedName, ResolvedType, Scope, Signature, Source, Specialization, Statement,
    StatementKind, TypedExpr,
};

pub(crate) fn program(namespaces: Vec<(&str, Vec<Callable>)>) -> Program {
    Program::new(
        namespaces
            .into_iter()
            .map(|(name, callables)| {
                Namespace::new(
                    name,
                    callables
                        .into_iter()
                        .map(NamespaceElement::Callable)
                        .collect(),
                )
            })
            .collect(),
    )
}

pub(crate) fn single_namespace(callables: Vec<Callable>) -> Program {
    program(vec![("Sample", callables)])
}

pub(crate) fn callable(
    kind: CallableKind,
    ns: &str,
    name: &str,
    input: ParamPattern,
    output: ResolvedType,
    statements: Vec<Statement>,
) -> Callable {
    Callable {
        name: QualifiedName::new(ns, name),
        kind,
        access: Access::Public,
        source: Source::code("main.qr"),
        range: None,
        signature: Signature::new(pattern_type(&input), output),
        input,
        specializations: vec![Specialization::body(Scope::new(statements))],
        attributes: Vec::new(),
        documentation: Vec::new(),
    }
}

/// A `Unit -> Unit` operation with the given body.
pub(crate) fn operation(ns: &str, name: &str, statements: Vec<Statement>) -> Callable {
    callable(
        CallableKind::Operation,
        ns,
        name,
        no_params(),
        ResolvedType::Unit,
        statements,
    )
}

/// A `Unit -> Unit` function with the given body.
pub(crate) fn function(ns: &str, name: &str, statements: Vec<Statement>) -> Callable {
    callable(
        CallableKind::Function,
        ns,
        name,
        no_params(),
        ResolvedType::Unit,
        statements,
    )
}

pub(crate) fn no_params() -> ParamPattern {
    ParamPattern::Tuple(Vec::new())
}

pub(crate) fn pattern_type(pattern: &ParamPattern) -> ResolvedType {
    match pattern {
        ParamPattern::Item(param) => param.ty.clone(),
        ParamPattern::Tuple(items) if items.is_empty() => ResolvedType::Unit,
        ParamPattern::Tuple(items) => {
            ResolvedType::Tuple(items.iter().map(pattern_type).collect())
        }
    }
}

/// An expression statement calling `callee` with `()`.
pub(crate) fn call_stmt(callee: &Callable) -> Statement {
    Statement::new(StatementKind::Expr(TypedExpr::call(
        TypedExpr::global(callee.name.clone(), callee.value_type()),
        TypedExpr::unit(),
        callee.signature.output.clone(),
    )))
}

pub(crate) fn expr_stmt(expr: TypedExpr) -> Statement {
    Statement::new(StatementKind::Expr(expr))
}
