//! Syntax-driven capability analysis.
//!
//! Four independent, pure analysers observe a callable declaration and
//! report [`Pattern`]s: syntactic sites that demand more than the base
//! capability. The solver joins pattern capabilities into a per-callable
//! source capability; reporting against a concrete target goes through
//! [`Pattern::diagnose`].

pub mod arrays;
pub mod result;
pub mod statements;
pub mod types;

#[cfg(test)]
mod analyzers_tests;

use qirin_hir::{Callable, QualifiedName, Range, RuntimeCapability, TypeArgs};

use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};

/// A flagged syntactic site and the capability it demands.
///
/// The diagnostic half is data, not a closure: reporting is the pure
/// predicate `capability > target` applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub capability: RuntimeCapability,
    pub diagnostic: Option<PatternDiagnostic>,
}

/// The diagnostic a pattern produces when its capability exceeds the
/// target. `arguments` hold the code-specific tail; the required
/// capability's name is prepended at diagnose time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDiagnostic {
    pub code: DiagnosticCode,
    pub arguments: Vec<String>,
    pub range: Range,
}

impl Pattern {
    pub fn new(capability: RuntimeCapability) -> Self {
        Self {
            capability,
            diagnostic: None,
        }
    }

    pub fn reported(
        capability: RuntimeCapability,
        code: DiagnosticCode,
        arguments: Vec<String>,
        range: Range,
    ) -> Self {
        Self {
            capability,
            diagnostic: Some(PatternDiagnostic {
                code,
                arguments,
                range,
            }),
        }
    }

    /// `Some(diagnostic)` iff this pattern's capability exceeds `target`.
    pub fn diagnose(&self, target: RuntimeCapability) -> Option<Diagnostic> {
        if target.implies(self.capability) {
            return None;
        }
        let info = self.diagnostic.as_ref()?;
        let mut arguments = vec![self.capability.to_string()];
        arguments.extend(info.arguments.iter().cloned());
        Some(Diagnostic {
            severity: Severity::Error,
            code: info.code,
            arguments,
            range: info.range,
        })
    }
}

/// A call site, for dependency-driven diagnostics: the callee demands
/// `capability` (its final inferred capability) at `range` inside the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPattern {
    pub callee: QualifiedName,
    pub type_args: TypeArgs,
    pub range: Range,
    pub capability: RuntimeCapability,
}

impl CallPattern {
    /// True when calling this callee is unsupported by `target`.
    pub fn should_report(&self, target: RuntimeCapability) -> bool {
        !target.implies(self.capability)
    }
}

/// Run all four analysers, in a fixed order, against one declaration.
pub fn analyze_callable(callable: &Callable) -> Vec<Pattern> {
    let mut patterns = result::analyze(callable);
    patterns.extend(statements::analyze(callable));
    patterns.extend(types::analyze(callable));
    patterns.extend(arrays::analyze(callable));
    patterns
}

/// Join of every pattern capability the analysers produce. Empty set means
/// the callable needs nothing beyond base.
pub fn source_capability(callable: &Callable) -> RuntimeCapability {
    analyze_callable(callable)
        .iter()
        .fold(RuntimeCapability::BASE, |acc, pattern| {
            acc.combine(pattern.capability)
        })
}
