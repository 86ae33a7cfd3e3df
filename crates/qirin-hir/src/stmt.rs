//! Scopes, statements, and binding patterns.

use crate::expr::TypedExpr;
use crate::position::Range;
use crate::types::ResolvedType;

/// A local variable visible inside a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSymbol {
    pub name: String,
    pub ty: ResolvedType,
    pub mutable: bool,
}

impl LocalSymbol {
    pub fn immutable(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: false,
        }
    }

    pub fn mutable(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: true,
        }
    }
}

/// A statement block plus the symbols already in scope at its entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scope {
    pub known_symbols: Vec<LocalSymbol>,
    pub statements: Vec<Statement>,
}

impl Scope {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            known_symbols: Vec::new(),
            statements,
        }
    }

    pub fn with_known_symbols(known_symbols: Vec<LocalSymbol>, statements: Vec<Statement>) -> Self {
        Self {
            known_symbols,
            statements,
        }
    }
}

/// A binding target: a symbol tree. Also the parameter pattern of a lambda.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingPattern {
    Name(String),
    Discard,
    Tuple(Vec<BindingPattern>),
}

impl BindingPattern {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Bound names, left to right.
    pub fn names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Name(name) => out.push(name),
            Self::Discard => {}
            Self::Tuple(items) => {
                for item in items {
                    item.collect_names(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub range: Option<Range>,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self { kind, range: None }
    }

    pub fn with_range(kind: StatementKind, range: Range) -> Self {
        Self {
            kind,
            range: Some(range),
        }
    }

    /// Symbols this statement introduces for its *following* siblings.
    ///
    /// Bindings local to a nested scope (loop variables, qubit bindings) are
    /// visible to statements inside that scope, not to siblings, so they are
    /// not reported here.
    pub fn declared_symbols(&self) -> Vec<LocalSymbol> {
        match &self.kind {
            StatementKind::Let { pattern, value } => binding_symbols(pattern, &value.ty, false),
            StatementKind::Mutable { pattern, value } => binding_symbols(pattern, &value.ty, true),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Expr(TypedExpr),
    Let {
        pattern: BindingPattern,
        value: TypedExpr,
    },
    Mutable {
        pattern: BindingPattern,
        value: TypedExpr,
    },
    Set {
        name: String,
        value: TypedExpr,
    },
    /// `set xs w/= index <- value`: in-place item update on a mutable array.
    SetUpdate {
        name: String,
        index: TypedExpr,
        value: TypedExpr,
    },
    Return(TypedExpr),
    Fail(TypedExpr),
    If {
        branches: Vec<(TypedExpr, Scope)>,
        else_scope: Option<Scope>,
    },
    For {
        pattern: BindingPattern,
        iterable: TypedExpr,
        body: Scope,
    },
    While {
        condition: TypedExpr,
        body: Scope,
    },
    Repeat {
        body: Scope,
        until: TypedExpr,
        fixup: Option<Scope>,
    },
    QubitAlloc {
        pattern: BindingPattern,
        kind: QubitAllocKind,
        body: Scope,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QubitAllocKind {
    Use,
    Borrow,
}

/// The locals a binding pattern introduces when bound to a value of `ty`.
pub fn binding_symbols(
    pattern: &BindingPattern,
    ty: &ResolvedType,
    mutable: bool,
) -> Vec<LocalSymbol> {
    match (pattern, ty) {
        (BindingPattern::Name(name), _) => vec![LocalSymbol {
            name: name.clone(),
            ty: ty.clone(),
            mutable,
        }],
        (BindingPattern::Discard, _) => Vec::new(),
        (BindingPattern::Tuple(items), ResolvedType::Tuple(types)) if items.len() == types.len() => {
            items
                .iter()
                .zip(types)
                .flat_map(|(item, item_ty)| binding_symbols(item, item_ty, mutable))
                .collect()
        }
        // Shape mismatches cannot occur in a type-checked tree; binding the
        // whole tuple type to each name keeps this total anyway.
        (BindingPattern::Tuple(items), _) => items
            .iter()
            .flat_map(|item| binding_symbols(item, ty, mutable))
            .collect(),
    }
}
