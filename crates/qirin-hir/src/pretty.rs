//! Plain-text rendering of programs and callables.
//!
//! Test suites snapshot this output; hosts use it for dumps. The rendering
//! is stable and source-order.

use std::fmt::Write;

use crate::expr::{BinaryOp, ExprKind, Identifier, ResultValue, TypedExpr, UnaryOp};
use crate::program::{
    Callable, CallableKind, Implementation, Namespace, ParamPattern, Program, SpecializationKind,
};
use crate::stmt::{BindingPattern, QubitAllocKind, Scope, Statement, StatementKind};

pub fn program(program: &Program) -> String {
    let mut out = String::new();
    for (i, ns) in program.namespaces.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        namespace(ns, &mut out);
    }
    out
}

pub fn namespace(ns: &Namespace, out: &mut String) {
    let _ = writeln!(out, "namespace {} {{", ns.name);
    for element in &ns.elements {
        match element {
            crate::program::NamespaceElement::Callable(c) => callable_into(c, 1, out),
            crate::program::NamespaceElement::Type(decl) => {
                let _ = writeln!(out, "    newtype {} = {};", decl.name.name, decl.underlying);
            }
        }
    }
    out.push_str("}\n");
}

pub fn callable(c: &Callable) -> String {
    let mut out = String::new();
    callable_into(c, 0, &mut out);
    out
}

fn callable_into(c: &Callable, depth: usize, out: &mut String) {
    let pad = "    ".repeat(depth);
    for attr in &c.attributes {
        let args = attr
            .arguments
            .iter()
            .map(|a| format!("{a:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{pad}@{}({args})", attr.name);
    }

    let keyword = match c.kind {
        CallableKind::Function => "function",
        CallableKind::Operation => "operation",
        CallableKind::TypeConstructor => "newtype",
    };
    let _ = write!(out, "{pad}{keyword} {} ", c.name.name);
    param_pattern(&c.input, out);
    let _ = write!(out, " : {}", c.signature.output);

    let provided: Vec<_> = c
        .specializations
        .iter()
        .filter_map(|spec| match &spec.implementation {
            Implementation::Provided(scope) => Some((spec.kind, scope)),
            _ => None,
        })
        .collect();

    match provided.as_slice() {
        [] => {
            out.push_str(";\n");
        }
        [(SpecializationKind::Body, scope)] if c.specializations.len() == 1 => {
            out.push(' ');
            scope_into(scope, depth, out);
        }
        specs => {
            out.push_str(" {\n");
            for (kind, scope) in specs {
                let name = match kind {
                    SpecializationKind::Body => "body",
                    SpecializationKind::Adjoint => "adjoint",
                    SpecializationKind::Controlled => "controlled",
                    SpecializationKind::ControlledAdjoint => "controlled adjoint",
                };
                let _ = write!(out, "{pad}    {name} ");
                scope_into(scope, depth + 1, out);
            }
            let _ = writeln!(out, "{pad}}}");
        }
    }
}

fn param_pattern(pattern: &ParamPattern, out: &mut String) {
    match pattern {
        ParamPattern::Item(param) => {
            let _ = write!(out, "({} : {})", param.name, param.ty);
        }
        ParamPattern::Tuple(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match item {
                    ParamPattern::Item(param) => {
                        let _ = write!(out, "{} : {}", param.name, param.ty);
                    }
                    nested @ ParamPattern::Tuple(_) => param_pattern(nested, out),
                }
            }
            out.push(')');
        }
    }
}

fn scope_into(scope: &Scope, depth: usize, out: &mut String) {
    out.push_str("{\n");
    for stmt in &scope.statements {
        statement_into(stmt, depth + 1, out);
    }
    let _ = writeln!(out, "{}}}", "    ".repeat(depth));
}

fn statement_into(stmt: &Statement, depth: usize, out: &mut String) {
    let pad = "    ".repeat(depth);
    match &stmt.kind {
        StatementKind::Expr(e) => {
            let _ = writeln!(out, "{pad}{};", expr(e));
        }
        StatementKind::Let { pattern, value } => {
            let _ = writeln!(out, "{pad}let {} = {};", binding(pattern), expr(value));
        }
        StatementKind::Mutable { pattern, value } => {
            let _ = writeln!(out, "{pad}mutable {} = {};", binding(pattern), expr(value));
        }
        StatementKind::Set { name, value } => {
            let _ = writeln!(out, "{pad}set {name} = {};", expr(value));
        }
        StatementKind::SetUpdate { name, index, value } => {
            let _ = writeln!(out, "{pad}set {name} w/= {} <- {};", expr(index), expr(value));
        }
        StatementKind::Return(e) => {
            let _ = writeln!(out, "{pad}return {};", expr(e));
        }
        StatementKind::Fail(e) => {
            let _ = writeln!(out, "{pad}fail {};", expr(e));
        }
        StatementKind::If {
            branches,
            else_scope,
        } => {
            for (i, (cond, scope)) in branches.iter().enumerate() {
                let keyword = if i == 0 { "if" } else { "elif" };
                let _ = write!(out, "{pad}{keyword} {} ", expr(cond));
                scope_into(scope, depth, out);
            }
            if let Some(scope) = else_scope {
                let _ = write!(out, "{pad}else ");
                scope_into(scope, depth, out);
            }
        }
        StatementKind::For {
            pattern,
            iterable,
            body,
        } => {
            let _ = write!(out, "{pad}for {} in {} ", binding(pattern), expr(iterable));
            scope_into(body, depth, out);
        }
        StatementKind::While { condition, body } => {
            let _ = write!(out, "{pad}while {} ", expr(condition));
            scope_into(body, depth, out);
        }
        StatementKind::Repeat { body, until, fixup } => {
            let _ = write!(out, "{pad}repeat ");
            scope_into(body, depth, out);
            let _ = write!(out, "{pad}until {}", expr(until));
            match fixup {
                Some(fixup) => {
                    out.push_str(" fixup ");
                    scope_into(fixup, depth, out);
                }
                None => out.push_str(";\n"),
            }
        }
        StatementKind::QubitAlloc {
            pattern,
            kind,
            body,
        } => {
            let keyword = match kind {
                QubitAllocKind::Use => "use",
                QubitAllocKind::Borrow => "borrow",
            };
            let _ = write!(out, "{pad}{keyword} {} = Qubit() ", binding(pattern));
            scope_into(body, depth, out);
        }
    }
}

fn binding(pattern: &BindingPattern) -> String {
    match pattern {
        BindingPattern::Name(name) => name.clone(),
        BindingPattern::Discard => "_".to_string(),
        BindingPattern::Tuple(items) => {
            let inner = items.iter().map(binding).collect::<Vec<_>>().join(", ");
            format!("({inner})")
        }
    }
}

pub fn expr(e: &TypedExpr) -> String {
    match &e.kind {
        ExprKind::Unit => "()".to_string(),
        ExprKind::IntLit(v) => v.to_string(),
        ExprKind::DoubleLit(v) => format!("{v:?}"),
        ExprKind::BoolLit(v) => v.to_string(),
        ExprKind::StringLit(s) => format!("{s:?}"),
        ExprKind::ResultLit(ResultValue::Zero) => "Zero".to_string(),
        ExprKind::ResultLit(ResultValue::One) => "One".to_string(),
        ExprKind::Ident(Identifier::Local(name)) => name.clone(),
        ExprKind::Ident(Identifier::Global(name)) => name.to_string(),
        ExprKind::Tuple(items) => {
            let inner = items.iter().map(expr).collect::<Vec<_>>().join(", ");
            format!("({inner})")
        }
        ExprKind::ArrayLit(items) => {
            let inner = items.iter().map(expr).collect::<Vec<_>>().join(", ");
            format!("[{inner}]")
        }
        ExprKind::SizedArray { value, size } => {
            format!("[{}, size = {}]", expr(value), expr(size))
        }
        ExprKind::Index { array, index } => format!("{}[{}]", expr(array), expr(index)),
        ExprKind::CopyAndUpdate {
            array,
            index,
            value,
        } => format!("({} w/ {} <- {})", expr(array), expr(index), expr(value)),
        ExprKind::Call { callee, arg } => {
            let args = match &arg.kind {
                ExprKind::Unit => String::new(),
                ExprKind::Tuple(items) => {
                    items.iter().map(expr).collect::<Vec<_>>().join(", ")
                }
                _ => expr(arg),
            };
            format!("{}({args})", expr(callee))
        }
        ExprKind::Missing => "_".to_string(),
        ExprKind::UnOp { op, operand } => {
            let sign = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Not => "not ",
            };
            format!("{sign}{}", expr(operand))
        }
        ExprKind::BinOp { op, lhs, rhs } => {
            let sign = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
                BinaryOp::Mod => "%",
                BinaryOp::And => "and",
                BinaryOp::Or => "or",
                BinaryOp::Eq => "==",
                BinaryOp::Neq => "!=",
                BinaryOp::Lt => "<",
                BinaryOp::Lte => "<=",
                BinaryOp::Gt => ">",
                BinaryOp::Gte => ">=",
            };
            format!("({} {sign} {})", expr(lhs), expr(rhs))
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => format!(
            "({} ? {} | {})",
            expr(cond),
            expr(then),
            expr(otherwise)
        ),
        ExprKind::Adjoint(inner) => format!("Adjoint {}", expr(inner)),
        ExprKind::Controlled(inner) => format!("Controlled {}", expr(inner)),
        ExprKind::Lambda(lambda) => {
            let arrow = match lambda.kind {
                CallableKind::Operation => "=>",
                _ => "->",
            };
            format!("{} {arrow} {}", binding(&lambda.param), expr(&lambda.body))
        }
    }
}
