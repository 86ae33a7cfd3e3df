//! The shared body-lifting routine.
//!
//! Turns a lambda into a fresh top-level callable plus the expression that
//! replaces the lambda site. Returns `None` when lifting would not preserve
//! semantics; the caller then leaves the lambda in place.

use indexmap::IndexSet;

use qirin_hir::{
    Access, BindingPattern, Callable, CallableInformation, CallableKind, ExprKind, Identifier,
    Lambda, LocalSymbol, ParamPattern, Range, ResolvedType, Scope, Signature, Specialization,
    Statement, StatementKind, TypedExpr,
};

use crate::{PassError, Result};

use super::LambdaLifter;

/// Name of the synthetic parameter standing in for a `()` lambda parameter
/// list.
pub const LAMBDA_UNIT_PARAM: &str = "__lambdaUnitParam__";

pub(super) fn lift_lambda(
    lifter: &mut LambdaLifter,
    lambda: &Lambda,
    lambda_ty: &ResolvedType,
    range: Option<Range>,
) -> Result<Option<(TypedExpr, Callable)>> {
    let Some((input_ty, output_ty)) = lambda_ty.io() else {
        return Err(PassError::LambdaShape {
            expected: "a function or operation type".to_string(),
            got: lambda_ty.to_string(),
        });
    };

    let lambda_params = match_params(&lambda.param, input_ty)?;

    // The captured environment: locals the body mentions that are visible
    // at the lambda site, in declaration order.
    let used = used_locals(&lambda.body, &lambda.param);
    let captured: Vec<LocalSymbol> = lifter
        .scope
        .visible()
        .into_iter()
        .filter(|symbol| used.contains(symbol.name.as_str()))
        .collect();

    // Closing over a mutable local would detach the copy from later `set`
    // updates; refuse and leave the lambda alone.
    if captured.iter().any(|symbol| symbol.mutable) {
        return Ok(None);
    }

    let current = lifter
        .current
        .clone()
        .expect("lambdas only occur inside callables");

    let info = match lambda.kind {
        CallableKind::Operation => lambda_ty.callable_info().unwrap_or(CallableInformation::EMPTY),
        _ => CallableInformation::EMPTY,
    };

    let (pattern, full_input_ty) = if captured.is_empty() {
        (lambda_params, input_ty.clone())
    } else {
        let captured_pattern = captured_param_pattern(&captured);
        let captured_ty = captured_type(&captured);
        (
            ParamPattern::Tuple(vec![captured_pattern, lambda_params]),
            ResolvedType::tuple([captured_ty, input_ty.clone()]),
        )
    };

    let name = lifter.fresh_name();

    // The generated body: the current known-variables as entry symbols, and
    // a single return of the lambda's body.
    let scope = Scope::with_known_symbols(
        lifter.scope.visible(),
        vec![Statement::new(StatementKind::Return(lambda.body.clone()))],
    );

    let generated = Callable {
        name: name.clone(),
        kind: current.kind,
        access: Access::Internal,
        source: current.source.clone(),
        range,
        signature: Signature {
            type_params: Vec::new(),
            input: full_input_ty.clone(),
            output: output_ty.clone(),
            info,
        },
        input: pattern,
        specializations: vec![Specialization::body(scope)],
        attributes: Vec::new(),
        documentation: Vec::new(),
    };

    // The replacement has exactly the lambda's original type: a bare
    // reference when nothing was captured, otherwise a partial application
    // supplying the captured tuple and leaving the lambda parameters open.
    let callee = TypedExpr {
        range,
        ..TypedExpr::global(name, generated.value_type())
    };
    let replacement = if captured.is_empty() {
        TypedExpr {
            ty: lambda_ty.clone(),
            ..callee
        }
    } else {
        let captured_arg = captured_argument(&captured);
        let arg = TypedExpr::tuple(vec![captured_arg, TypedExpr::missing(input_ty.clone())]);
        TypedExpr {
            range,
            ..TypedExpr::call(callee, arg, lambda_ty.clone())
        }
    };

    Ok(Some((replacement, generated)))
}

/// Derive the generated callable's parameters from the lambda's symbol tree
/// and the input half of its resolved type.
fn match_params(param: &BindingPattern, input_ty: &ResolvedType) -> Result<ParamPattern> {
    match (param, input_ty) {
        // A bare symbol accepts the whole input, whatever its type.
        (BindingPattern::Name(name), ty) => Ok(ParamPattern::item(name.clone(), ty.clone())),
        (BindingPattern::Discard, ty) => Ok(ParamPattern::item("_", ty.clone())),
        // `()` parameter lists become one synthetic Unit parameter.
        (BindingPattern::Tuple(items), ResolvedType::Unit) if items.is_empty() => {
            Ok(ParamPattern::item(LAMBDA_UNIT_PARAM, ResolvedType::Unit))
        }
        (BindingPattern::Tuple(items), ResolvedType::Tuple(types))
            if items.len() == types.len() =>
        {
            let params = items
                .iter()
                .zip(types)
                .map(|(item, item_ty)| match_params(item, item_ty))
                .collect::<Result<_>>()?;
            Ok(ParamPattern::Tuple(params))
        }
        (pattern, ty) => Err(PassError::LambdaShape {
            expected: ty.to_string(),
            got: describe_pattern(pattern),
        }),
    }
}

fn describe_pattern(pattern: &BindingPattern) -> String {
    match pattern {
        BindingPattern::Name(name) => name.clone(),
        BindingPattern::Discard => "_".to_string(),
        BindingPattern::Tuple(items) => {
            let inner = items
                .iter()
                .map(describe_pattern)
                .collect::<Vec<_>>()
                .join(", ");
            format!("({inner})")
        }
    }
}

/// Local identifiers the body uses that the lambda does not bind itself.
///
/// Nested lambdas shadow with their own parameters, so a name bound by an
/// inner lambda does not count as used by the outer one.
fn used_locals(body: &TypedExpr, param: &BindingPattern) -> IndexSet<String> {
    let mut used = IndexSet::new();
    let mut bound: Vec<String> = param.names().into_iter().map(str::to_string).collect();
    collect_used(body, &mut bound, &mut used);
    used
}

fn collect_used(expr: &TypedExpr, bound: &mut Vec<String>, used: &mut IndexSet<String>) {
    match &expr.kind {
        ExprKind::Ident(Identifier::Local(name)) => {
            if !bound.iter().any(|b| b == name) {
                used.insert(name.clone());
            }
        }
        ExprKind::Lambda(inner) => {
            let before = bound.len();
            bound.extend(inner.param.names().into_iter().map(str::to_string));
            collect_used(&inner.body, bound, used);
            bound.truncate(before);
        }
        _ => expr.for_each_child(&mut |child| collect_used(child, bound, used)),
    }
}

fn captured_param_pattern(captured: &[LocalSymbol]) -> ParamPattern {
    match captured {
        [single] => ParamPattern::item(&single.name, single.ty.clone()),
        many => ParamPattern::Tuple(
            many.iter()
                .map(|symbol| ParamPattern::item(&symbol.name, symbol.ty.clone()))
                .collect(),
        ),
    }
}

fn captured_type(captured: &[LocalSymbol]) -> ResolvedType {
    match captured {
        [single] => single.ty.clone(),
        many => ResolvedType::Tuple(many.iter().map(|symbol| symbol.ty.clone()).collect()),
    }
}

fn captured_argument(captured: &[LocalSymbol]) -> TypedExpr {
    match captured {
        [single] => TypedExpr::local(&single.name, single.ty.clone()),
        many => TypedExpr::tuple(
            many.iter()
                .map(|symbol| TypedExpr::local(&symbol.name, symbol.ty.clone()))
                .collect(),
        ),
    }
}

/// Element type when iterating a value of `ty`.
pub(super) fn iteration_item_type(ty: &ResolvedType) -> ResolvedType {
    match ty {
        ResolvedType::Array(item) => (**item).clone(),
        ResolvedType::Range => ResolvedType::Int,
        other => other.clone(),
    }
}

/// Input half of a lambda's resolved type.
pub(super) fn lambda_input_type(ty: &ResolvedType, param: &BindingPattern) -> Result<ResolvedType> {
    match ty.io() {
        Some((input, _)) => Ok(input.clone()),
        None => Err(PassError::LambdaShape {
            expected: "a function or operation type".to_string(),
            got: format!("{} bound to {}", ty, describe_pattern(param)),
        }),
    }
}
