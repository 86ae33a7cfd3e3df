//! Typed expressions and their builders.

use crate::position::Range;
use crate::program::{CallableKind, QualifiedName};
use crate::stmt::BindingPattern;
use crate::types::ResolvedType;

/// Type-argument resolution at a use site: type-parameter name paired with
/// the concrete type chosen for it, in declaration order.
pub type TypeArgs = Vec<(String, ResolvedType)>;

/// Facts inferred during type checking that later passes rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprInfo {
    pub is_mutable: bool,
    pub has_local_quantum_deps: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: ExprKind,
    pub ty: ResolvedType,
    pub type_args: TypeArgs,
    pub info: ExprInfo,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultValue {
    Zero,
    One,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Local(String),
    Global(QualifiedName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::Neq)
    }
}

/// An anonymous callable written as an expression. The body is a single
/// expression; statement bodies are desugared before this representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub kind: CallableKind,
    pub param: BindingPattern,
    pub body: TypedExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Unit,
    IntLit(i64),
    DoubleLit(f64),
    BoolLit(bool),
    StringLit(String),
    ResultLit(ResultValue),
    Ident(Identifier),
    Tuple(Vec<TypedExpr>),
    ArrayLit(Vec<TypedExpr>),
    /// `[value, size = n]`: an array of `size` copies of `value`.
    SizedArray {
        value: Box<TypedExpr>,
        size: Box<TypedExpr>,
    },
    Index {
        array: Box<TypedExpr>,
        index: Box<TypedExpr>,
    },
    /// `array w/ index <- value`.
    CopyAndUpdate {
        array: Box<TypedExpr>,
        index: Box<TypedExpr>,
        value: Box<TypedExpr>,
    },
    Call {
        callee: Box<TypedExpr>,
        arg: Box<TypedExpr>,
    },
    /// The `_` of a partial application.
    Missing,
    UnOp {
        op: UnaryOp,
        operand: Box<TypedExpr>,
    },
    BinOp {
        op: BinaryOp,
        lhs: Box<TypedExpr>,
        rhs: Box<TypedExpr>,
    },
    Conditional {
        cond: Box<TypedExpr>,
        then: Box<TypedExpr>,
        otherwise: Box<TypedExpr>,
    },
    Adjoint(Box<TypedExpr>),
    Controlled(Box<TypedExpr>),
    Lambda(Box<Lambda>),
}

impl TypedExpr {
    pub fn new(kind: ExprKind, ty: ResolvedType) -> Self {
        Self {
            kind,
            ty,
            type_args: Vec::new(),
            info: ExprInfo::default(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn unit() -> Self {
        Self::new(ExprKind::Unit, ResolvedType::Unit)
    }

    pub fn int_lit(value: i64) -> Self {
        Self::new(ExprKind::IntLit(value), ResolvedType::Int)
    }

    pub fn bool_lit(value: bool) -> Self {
        Self::new(ExprKind::BoolLit(value), ResolvedType::Bool)
    }

    pub fn double_lit(value: f64) -> Self {
        Self::new(ExprKind::DoubleLit(value), ResolvedType::Double)
    }

    pub fn result_lit(value: ResultValue) -> Self {
        Self::new(ExprKind::ResultLit(value), ResolvedType::Result)
    }

    pub fn local(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self::new(ExprKind::Ident(Identifier::Local(name.into())), ty)
    }

    pub fn global(name: QualifiedName, ty: ResolvedType) -> Self {
        Self::new(ExprKind::Ident(Identifier::Global(name)), ty)
    }

    pub fn tuple(items: Vec<TypedExpr>) -> Self {
        let ty = ResolvedType::Tuple(items.iter().map(|item| item.ty.clone()).collect());
        Self::new(ExprKind::Tuple(items), ty)
    }

    pub fn call(callee: TypedExpr, arg: TypedExpr, output: ResolvedType) -> Self {
        Self::new(
            ExprKind::Call {
                callee: Box::new(callee),
                arg: Box::new(arg),
            },
            output,
        )
    }

    /// A hole (`_`) of the given type inside a partial application.
    pub fn missing(ty: ResolvedType) -> Self {
        Self::new(ExprKind::Missing, ty)
    }

    pub fn bin_op(op: BinaryOp, lhs: TypedExpr, rhs: TypedExpr, ty: ResolvedType) -> Self {
        Self::new(
            ExprKind::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    /// `lhs == rhs` over any operand type.
    pub fn equality(lhs: TypedExpr, rhs: TypedExpr) -> Self {
        Self::bin_op(BinaryOp::Eq, lhs, rhs, ResolvedType::Bool)
    }

    pub fn lambda(kind: CallableKind, param: BindingPattern, body: TypedExpr, ty: ResolvedType) -> Self {
        Self::new(
            ExprKind::Lambda(Box::new(Lambda { kind, param, body })),
            ty,
        )
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self.kind, ExprKind::Lambda(_))
    }

    /// True when any subexpression, including `self`, is a lambda.
    pub fn contains_lambda(&self) -> bool {
        if self.is_lambda() {
            return true;
        }
        let mut found = false;
        self.for_each_child(&mut |child| {
            if child.contains_lambda() {
                found = true;
            }
        });
        found
    }

    /// Apply `f` to each direct subexpression in source order.
    pub fn for_each_child<'a>(&'a self, f: &mut impl FnMut(&'a TypedExpr)) {
        match &self.kind {
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
                    f(item);
                }
            }
            ExprKind::SizedArray { value, size } => {
                f(value);
                f(size);
            }
            ExprKind::Index { array, index } => {
                f(array);
                f(index);
            }
            ExprKind::CopyAndUpdate {
                array,
                index,
                value,
            } => {
                f(array);
                f(index);
                f(value);
            }
            ExprKind::Call { callee, arg } => {
                f(callee);
                f(arg);
            }
            ExprKind::UnOp { operand, .. } => f(operand),
            ExprKind::BinOp { lhs, rhs, .. } => {
                f(lhs);
                f(rhs);
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                f(cond);
                f(then);
                f(otherwise);
            }
            ExprKind::Adjoint(inner) | ExprKind::Controlled(inner) => f(inner),
            ExprKind::Lambda(lambda) => f(&lambda.body),
        }
    }
}
