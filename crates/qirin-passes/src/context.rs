//! Global resolution context.
//!
//! The host-facing lookup surface over a program: every pass that needs
//! "name to declaration" goes through an explicit [`GlobalResolutions`]
//! value instead of any process-wide registry.

use indexmap::{IndexMap, IndexSet};

use qirin_hir::{Callable, Implementation, Program, QualifiedName, SpecializationKind};

/// Result of resolving a callable name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Callable),
    NotFound,
    /// The name is declared more than once.
    Ambiguous,
}

#[derive(Debug)]
pub struct GlobalResolutions<'a> {
    callables: IndexMap<&'a QualifiedName, &'a Callable>,
    duplicated: IndexSet<&'a QualifiedName>,
}

impl<'a> GlobalResolutions<'a> {
    pub fn new(program: &'a Program) -> Self {
        let mut callables: IndexMap<&QualifiedName, &Callable> = IndexMap::new();
        let mut duplicated = IndexSet::new();
        for callable in program.callables() {
            if callables.insert(&callable.name, callable).is_some() {
                duplicated.insert(&callable.name);
            }
        }
        Self {
            callables,
            duplicated,
        }
    }

    pub fn try_get_callable(&self, name: &QualifiedName) -> Lookup<'a> {
        if self.duplicated.contains(name) {
            return Lookup::Ambiguous;
        }
        match self.callables.get(name) {
            Some(callable) => Lookup::Found(callable),
            None => Lookup::NotFound,
        }
    }

    /// Unambiguous resolution, or `None`.
    pub fn get(&self, name: &QualifiedName) -> Option<&'a Callable> {
        match self.try_get_callable(name) {
            Lookup::Found(callable) => Some(callable),
            Lookup::NotFound | Lookup::Ambiguous => None,
        }
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.callables.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a QualifiedName, &'a Callable)> {
        self.callables.iter().map(|(&name, &callable)| (name, callable))
    }

    /// Specializations of a referenced-library callable, with their
    /// implementations. Empty for source-declared callables.
    pub fn imported_specializations(
        &self,
        name: &QualifiedName,
    ) -> impl Iterator<Item = (SpecializationKind, &'a Implementation)> {
        self.get(name)
            .filter(|callable| !callable.source.is_code())
            .into_iter()
            .flat_map(|callable| {
                callable
                    .specializations
                    .iter()
                    .map(|spec| (spec.kind, &spec.implementation))
            })
    }
}
