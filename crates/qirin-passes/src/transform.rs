//! Rewriting HIR traversal.
//!
//! The rewriting mirror of [`crate::visitor`]: `on_*` methods consume a node
//! and return its replacement, with `rewrite_*` free functions providing the
//! default recursion into children (source order). Overrides call the
//! `rewrite_*` default explicitly to continue below themselves.
//!
//! Expression rewrites are checked: unless a transformer opts out via
//! [`Transformer::requires_type_preservation`], returning an expression
//! whose resolved type differs from the one it replaced fails the pass with
//! [`PassError::TypeInvariant`].

use qirin_hir::{
    Callable, ExprKind, Implementation, Lambda, Namespace, NamespaceElement, Program, ResolvedType,
    Scope, Specialization, Statement, StatementKind, TypedExpr,
};

use crate::{PassError, Result};

pub trait Transformer: Sized {
    /// Whether expression rewrites must preserve resolved types.
    fn requires_type_preservation(&self) -> bool {
        true
    }

    fn on_program(&mut self, program: Program) -> Result<Program> {
        rewrite_program(self, program)
    }

    fn on_namespace(&mut self, namespace: Namespace) -> Result<Namespace> {
        rewrite_namespace(self, namespace)
    }

    fn on_callable(&mut self, callable: Callable) -> Result<Callable> {
        rewrite_callable(self, callable)
    }

    fn on_specialization(&mut self, specialization: Specialization) -> Result<Specialization> {
        rewrite_specialization(self, specialization)
    }

    fn on_scope(&mut self, scope: Scope) -> Result<Scope> {
        rewrite_scope(self, scope)
    }

    fn on_statement(&mut self, statement: Statement) -> Result<Statement> {
        rewrite_statement(self, statement)
    }

    fn on_expr(&mut self, expr: TypedExpr) -> Result<TypedExpr> {
        rewrite_expr(self, expr)
    }

    fn on_type(&mut self, ty: ResolvedType) -> Result<ResolvedType> {
        Ok(ty)
    }
}

/// Rewrite a child expression and enforce the type-preservation invariant.
///
/// All recursion in this module funnels expression children through here, so
/// an override can never silently change a subterm's type.
pub fn checked_expr<T: Transformer>(t: &mut T, expr: TypedExpr) -> Result<TypedExpr> {
    let original = expr.ty.clone();
    let replacement = t.on_expr(expr)?;
    if t.requires_type_preservation() && replacement.ty != original {
        return Err(PassError::TypeInvariant {
            original: original.to_string(),
            replacement: replacement.ty.to_string(),
        });
    }
    Ok(replacement)
}

pub fn rewrite_program<T: Transformer>(t: &mut T, program: Program) -> Result<Program> {
    let namespaces = program
        .namespaces
        .into_iter()
        .map(|ns| t.on_namespace(ns))
        .collect::<Result<_>>()?;
    Ok(Program { namespaces })
}

pub fn rewrite_namespace<T: Transformer>(t: &mut T, namespace: Namespace) -> Result<Namespace> {
    let elements = namespace
        .elements
        .into_iter()
        .map(|element| match element {
            NamespaceElement::Callable(callable) => {
                Ok(NamespaceElement::Callable(t.on_callable(callable)?))
            }
            other @ NamespaceElement::Type(_) => Ok(other),
        })
        .collect::<Result<_>>()?;
    Ok(Namespace {
        name: namespace.name,
        elements,
    })
}

pub fn rewrite_callable<T: Transformer>(t: &mut T, mut callable: Callable) -> Result<Callable> {
    let specializations = std::mem::take(&mut callable.specializations);
    callable.specializations = specializations
        .into_iter()
        .map(|spec| t.on_specialization(spec))
        .collect::<Result<_>>()?;
    Ok(callable)
}

pub fn rewrite_specialization<T: Transformer>(
    t: &mut T,
    specialization: Specialization,
) -> Result<Specialization> {
    let implementation = match specialization.implementation {
        Implementation::Provided(scope) => Implementation::Provided(t.on_scope(scope)?),
        other => other,
    };
    Ok(Specialization {
        kind: specialization.kind,
        implementation,
    })
}

pub fn rewrite_scope<T: Transformer>(t: &mut T, scope: Scope) -> Result<Scope> {
    let statements = scope
        .statements
        .into_iter()
        .map(|statement| t.on_statement(statement))
        .collect::<Result<_>>()?;
    Ok(Scope {
        known_symbols: scope.known_symbols,
        statements,
    })
}

pub fn rewrite_statement<T: Transformer>(t: &mut T, statement: Statement) -> Result<Statement> {
    let kind = match statement.kind {
        StatementKind::Expr(e) => StatementKind::Expr(checked_expr(t, e)?),
        StatementKind::Let { pattern, value } => StatementKind::Let {
            pattern,
            value: checked_expr(t, value)?,
        },
        StatementKind::Mutable { pattern, value } => StatementKind::Mutable {
            pattern,
            value: checked_expr(t, value)?,
        },
        StatementKind::Set { name, value } => StatementKind::Set {
            name,
            value: checked_expr(t, value)?,
        },
        StatementKind::SetUpdate { name, index, value } => StatementKind::SetUpdate {
            name,
            index: checked_expr(t, index)?,
            value: checked_expr(t, value)?,
        },
        StatementKind::Return(e) => StatementKind::Return(checked_expr(t, e)?),
        StatementKind::Fail(e) => StatementKind::Fail(checked_expr(t, e)?),
        StatementKind::If {
            branches,
            else_scope,
        } => StatementKind::If {
            branches: branches
                .into_iter()
                .map(|(condition, scope)| {
                    Ok((checked_expr(t, condition)?, t.on_scope(scope)?))
                })
                .collect::<Result<_>>()?,
            else_scope: else_scope.map(|scope| t.on_scope(scope)).transpose()?,
        },
        StatementKind::For {
            pattern,
            iterable,
            body,
        } => StatementKind::For {
            pattern,
            iterable: checked_expr(t, iterable)?,
            body: t.on_scope(body)?,
        },
        StatementKind::While { condition, body } => StatementKind::While {
            condition: checked_expr(t, condition)?,
            body: t.on_scope(body)?,
        },
        StatementKind::Repeat { body, until, fixup } => StatementKind::Repeat {
            body: t.on_scope(body)?,
            until: checked_expr(t, until)?,
            fixup: fixup.map(|scope| t.on_scope(scope)).transpose()?,
        },
        StatementKind::QubitAlloc {
            pattern,
            kind,
            body,
        } => StatementKind::QubitAlloc {
            pattern,
            kind,
            body: t.on_scope(body)?,
        },
    };
    Ok(Statement {
        kind,
        range: statement.range,
    })
}

pub fn rewrite_expr<T: Transformer>(t: &mut T, expr: TypedExpr) -> Result<TypedExpr> {
    let ty = t.on_type(expr.ty)?;
    let kind = match expr.kind {
        leaf @ (ExprKind::Unit
        | ExprKind::IntLit(_)
        | ExprKind::DoubleLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::ResultLit(_)
        | ExprKind::Ident(_)
        | ExprKind::Missing) => leaf,
        ExprKind::Tuple(items) => ExprKind::Tuple(rewrite_all(t, items)?),
        ExprKind::ArrayLit(items) => ExprKind::ArrayLit(rewrite_all(t, items)?),
        ExprKind::SizedArray { value, size } => ExprKind::SizedArray {
            value: Box::new(checked_expr(t, *value)?),
            size: Box::new(checked_expr(t, *size)?),
        },
        ExprKind::Index { array, index } => ExprKind::Index {
            array: Box::new(checked_expr(t, *array)?),
            index: Box::new(checked_expr(t, *index)?),
        },
        ExprKind::CopyAndUpdate {
            array,
            index,
            value,
        } => ExprKind::CopyAndUpdate {
            array: Box::new(checked_expr(t, *array)?),
            index: Box::new(checked_expr(t, *index)?),
            value: Box::new(checked_expr(t, *value)?),
        },
        ExprKind::Call { callee, arg } => ExprKind::Call {
            callee: Box::new(checked_expr(t, *callee)?),
            arg: Box::new(checked_expr(t, *arg)?),
        },
        ExprKind::UnOp { op, operand } => ExprKind::UnOp {
            op,
            operand: Box::new(checked_expr(t, *operand)?),
        },
        ExprKind::BinOp { op, lhs, rhs } => ExprKind::BinOp {
            op,
            lhs: Box::new(checked_expr(t, *lhs)?),
            rhs: Box::new(checked_expr(t, *rhs)?),
        },
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => ExprKind::Conditional {
            cond: Box::new(checked_expr(t, *cond)?),
            then: Box::new(checked_expr(t, *then)?),
            otherwise: Box::new(checked_expr(t, *otherwise)?),
        },
        ExprKind::Adjoint(inner) => ExprKind::Adjoint(Box::new(checked_expr(t, *inner)?)),
        ExprKind::Controlled(inner) => ExprKind::Controlled(Box::new(checked_expr(t, *inner)?)),
        ExprKind::Lambda(lambda) => {
            let Lambda { kind, param, body } = *lambda;
            ExprKind::Lambda(Box::new(Lambda {
                kind,
                param,
                body: checked_expr(t, body)?,
            }))
        }
    };
    Ok(TypedExpr {
        kind,
        ty,
        type_args: expr.type_args,
        info: expr.info,
        range: expr.range,
    })
}

fn rewrite_all<T: Transformer>(t: &mut T, items: Vec<TypedExpr>) -> Result<Vec<TypedExpr>> {
    items.into_iter().map(|item| checked_expr(t, item)).collect()
}
