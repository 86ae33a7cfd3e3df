//! Read-only HIR traversal.
//!
//! # Usage
//!
//! Implement `Visitor` for your struct. Override `visit_*` methods to add
//! logic. Call `walk_*` within your override to continue recursion (or omit
//! it to stop). Children are visited in source order.

use qirin_hir::{
    Callable, ExprKind, Implementation, Namespace, NamespaceElement, Program, ResolvedType, Scope,
    Specialization, Statement, StatementKind, TypedExpr,
};

pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_namespace(&mut self, namespace: &Namespace) {
        walk_namespace(self, namespace);
    }

    fn visit_callable(&mut self, callable: &Callable) {
        walk_callable(self, callable);
    }

    fn visit_specialization(&mut self, specialization: &Specialization) {
        walk_specialization(self, specialization);
    }

    fn visit_scope(&mut self, scope: &Scope) {
        walk_scope(self, scope);
    }

    fn visit_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_expr(&mut self, expr: &TypedExpr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, _ty: &ResolvedType) {
        // Types are leaves by default; override to recurse.
    }
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for namespace in &program.namespaces {
        visitor.visit_namespace(namespace);
    }
}

pub fn walk_namespace<V: Visitor>(visitor: &mut V, namespace: &Namespace) {
    for element in &namespace.elements {
        if let NamespaceElement::Callable(callable) = element {
            visitor.visit_callable(callable);
        }
    }
}

pub fn walk_callable<V: Visitor>(visitor: &mut V, callable: &Callable) {
    for specialization in &callable.specializations {
        visitor.visit_specialization(specialization);
    }
}

pub fn walk_specialization<V: Visitor>(visitor: &mut V, specialization: &Specialization) {
    if let Implementation::Provided(scope) = &specialization.implementation {
        visitor.visit_scope(scope);
    }
}

pub fn walk_scope<V: Visitor>(visitor: &mut V, scope: &Scope) {
    for statement in &scope.statements {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, statement: &Statement) {
    match &statement.kind {
        StatementKind::Expr(e)
        | StatementKind::Return(e)
        | StatementKind::Fail(e)
        | StatementKind::Let { value: e, .. }
        | StatementKind::Mutable { value: e, .. }
        | StatementKind::Set { value: e, .. } => visitor.visit_expr(e),
        StatementKind::SetUpdate { index, value, .. } => {
            visitor.visit_expr(index);
            visitor.visit_expr(value);
        }
        StatementKind::If {
            branches,
            else_scope,
        } => {
            for (condition, scope) in branches {
                visitor.visit_expr(condition);
                visitor.visit_scope(scope);
            }
            if let Some(scope) = else_scope {
                visitor.visit_scope(scope);
            }
        }
        StatementKind::For {
            iterable, body, ..
        } => {
            visitor.visit_expr(iterable);
            visitor.visit_scope(body);
        }
        StatementKind::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_scope(body);
        }
        StatementKind::Repeat { body, until, fixup } => {
            visitor.visit_scope(body);
            visitor.visit_expr(until);
            if let Some(fixup) = fixup {
                visitor.visit_scope(fixup);
            }
        }
        StatementKind::QubitAlloc { body, .. } => visitor.visit_scope(body),
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &TypedExpr) {
    visitor.visit_type(&expr.ty);
    match &expr.kind {
        ExprKind::Unit
        | ExprKind::IntLit(_)
        | ExprKind::DoubleLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::ResultLit(_)
        | ExprKind::Ident(_)
        | ExprKind::Missing => {}
        ExprKind::Tuple(items) | ExprKind::ArrayLit(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        ExprKind::SizedArray { value, size } => {
            visitor.visit_expr(value);
            visitor.visit_expr(size);
        }
        ExprKind::Index { array, index } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
        }
        ExprKind::CopyAndUpdate {
            array,
            index,
            value,
        } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
            visitor.visit_expr(value);
        }
        ExprKind::Call { callee, arg } => {
            visitor.visit_expr(callee);
            visitor.visit_expr(arg);
        }
        ExprKind::UnOp { operand, .. } => visitor.visit_expr(operand),
        ExprKind::BinOp { lhs, rhs, .. } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_expr(then);
            visitor.visit_expr(otherwise);
        }
        ExprKind::Adjoint(inner) | ExprKind::Controlled(inner) => visitor.visit_expr(inner),
        ExprKind::Lambda(lambda) => visitor.visit_expr(&lambda.body),
    }
}
