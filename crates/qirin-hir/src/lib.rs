//! Qirin HIR: the typed program representation the compiler passes consume.
//!
//! A [`Program`] is an ordered sequence of namespaces holding callables;
//! callable bodies are scopes of statements over [`TypedExpr`] trees whose
//! types are fully resolved. Everything is plain owned data: passes treat
//! their input as immutable and produce new trees.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod attributes;
pub mod capability;
pub mod expr;
pub mod position;
pub mod pretty;
pub mod program;
pub mod stmt;
pub mod types;


pub use attributes::{Attribute, INFERRED_REASON, REQUIRES_CAPABILITY, required_capability};
pub use capability::{ClassicalCompute, ResultOpacity, RuntimeCapability};
pub use expr::{
    BinaryOp, ExprInfo, ExprKind, Identifier, Lambda, ResultValue, TypeArgs, TypedExpr, UnaryOp,
};
pub use position::{Position, Range};
pub use program::{
    Access, Callable, CallableKind, Implementation, Namespace, NamespaceElement, Param,
    ParamPattern, Program, QualifiedName, Signature, Source, SourceKind, Specialization,
    SpecializationKind, TypeDecl,
};
pub use stmt::{
    BindingPattern, LocalSymbol, QubitAllocKind, Scope, Statement, StatementKind, binding_symbols,
};
pub use types::{CallableInformation, ResolvedType};
