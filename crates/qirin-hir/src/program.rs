//! Programs, namespaces, and callable declarations.

use indexmap::IndexSet;

use crate::attributes::Attribute;
use crate::position::Range;
use crate::stmt::Scope;
use crate::types::{CallableInformation, ResolvedType};

/// A namespace-qualified callable or type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// An ordered sequence of namespaces. Immutable once built; passes produce
/// new programs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub namespaces: Vec<Namespace>,
}

impl Program {
    pub fn new(namespaces: Vec<Namespace>) -> Self {
        Self { namespaces }
    }

    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.namespaces.iter().flat_map(Namespace::callables)
    }

    pub fn get_callable(&self, name: &QualifiedName) -> Option<&Callable> {
        self.callables().find(|c| c.name == *name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub elements: Vec<NamespaceElement>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, elements: Vec<NamespaceElement>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }

    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.elements.iter().filter_map(|element| match element {
            NamespaceElement::Callable(callable) => Some(callable),
            NamespaceElement::Type(_) => None,
        })
    }

    /// Names already taken inside this namespace. Fresh-symbol generation
    /// probes against this set.
    pub fn defined_names(&self) -> IndexSet<&str> {
        self.elements
            .iter()
            .map(|element| match element {
                NamespaceElement::Callable(callable) => callable.name.name.as_str(),
                NamespaceElement::Type(decl) => decl.name.name.as_str(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceElement {
    Callable(Callable),
    Type(TypeDecl),
}

/// A user-defined type declaration. Only its name matters to the passes in
/// this workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: QualifiedName,
    pub underlying: ResolvedType,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function,
    Operation,
    TypeConstructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Declared in a source file of the current compilation.
    Code,
    /// Pulled in from a referenced library.
    Reference,
}

/// Where a declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub file: String,
    pub kind: SourceKind,
}

impl Source {
    pub fn code(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind: SourceKind::Code,
        }
    }

    pub fn reference(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind: SourceKind::Reference,
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == SourceKind::Code
    }
}

/// A top-level function, operation, or type constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub name: QualifiedName,
    pub kind: CallableKind,
    pub access: Access,
    pub source: Source,
    pub range: Option<Range>,
    pub signature: Signature,
    /// Parameter pattern. Its shape matches `signature.input`.
    pub input: ParamPattern,
    pub specializations: Vec<Specialization>,
    pub attributes: Vec<Attribute>,
    pub documentation: Vec<String>,
}

impl Callable {
    /// The body specialization's scope, when one is provided.
    pub fn body(&self) -> Option<&Scope> {
        self.specializations.iter().find_map(|spec| {
            match (&spec.kind, &spec.implementation) {
                (SpecializationKind::Body, Implementation::Provided(scope)) => Some(scope),
                _ => None,
            }
        })
    }

    /// The value type of referencing this callable.
    pub fn value_type(&self) -> ResolvedType {
        let input = self.signature.input.clone();
        let output = self.signature.output.clone();
        match self.kind {
            CallableKind::Function | CallableKind::TypeConstructor => {
                ResolvedType::Function(Box::new(input), Box::new(output), self.signature.info)
            }
            CallableKind::Operation => {
                ResolvedType::Operation(Box::new(input), Box::new(output), self.signature.info)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub type_params: Vec<String>,
    pub input: ResolvedType,
    pub output: ResolvedType,
    pub info: CallableInformation,
}

impl Signature {
    pub fn new(input: ResolvedType, output: ResolvedType) -> Self {
        Self {
            type_params: Vec::new(),
            input,
            output,
            info: CallableInformation::EMPTY,
        }
    }

    pub fn with_info(mut self, info: CallableInformation) -> Self {
        self.info = info;
        self
    }
}

/// The parameter tuple of a callable, mirroring the nesting of its input
/// type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamPattern {
    Item(Param),
    Tuple(Vec<ParamPattern>),
}

impl ParamPattern {
    pub fn item(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self::Item(Param {
            name: name.into(),
            ty,
            range: None,
        })
    }

    /// Leaf parameters in declaration order.
    pub fn params(&self) -> Vec<&Param> {
        let mut out = Vec::new();
        self.collect_params(&mut out);
        out
    }

    fn collect_params<'a>(&'a self, out: &mut Vec<&'a Param>) {
        match self {
            Self::Item(param) => out.push(param),
            Self::Tuple(items) => {
                for item in items {
                    item.collect_params(out);
                }
            }
        }
    }

    /// Number of items at the top level of the pattern.
    pub fn arity(&self) -> usize {
        match self {
            Self::Item(_) => 1,
            Self::Tuple(items) => items.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: ResolvedType,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecializationKind {
    Body,
    Adjoint,
    Controlled,
    ControlledAdjoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    pub kind: SpecializationKind,
    pub implementation: Implementation,
}

impl Specialization {
    pub fn body(scope: Scope) -> Self {
        Self {
            kind: SpecializationKind::Body,
            implementation: Implementation::Provided(scope),
        }
    }

    pub fn intrinsic() -> Self {
        Self {
            kind: SpecializationKind::Body,
            implementation: Implementation::Intrinsic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Implementation {
    Provided(Scope),
    Intrinsic,
    External,
    Generated,
}
