//! Qirin passes: lambda lifting and runtime-capability inference.
//!
//! # Example
//!
//! ```
//! use qirin_hir::Program;
//! use qirin_passes::Compilation;
//!
//! let program = Program::default();
//! let compilation = Compilation::new(program).lift_lambdas().infer_capabilities();
//!
//! if !compilation.is_valid() {
//!     eprintln!("{}", compilation.diagnostics().printer().render());
//! }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyzers;
pub mod callgraph;
pub mod context;
pub mod diagnostics;
pub mod lift;
pub mod scope;
pub mod solver;
pub mod transform;
pub mod visitor;

#[cfg(test)]
mod callgraph_tests;
#[cfg(test)]
pub(crate) mod test_fixtures;
#[cfg(test)]
mod walker_tests;

use qirin_hir::{Program, RuntimeCapability};

pub use callgraph::{CallGraph, CallKind, CallSite};
pub use context::{GlobalResolutions, Lookup};
pub use diagnostics::{
    Diagnostic, DiagnosticCode, Diagnostics, DiagnosticsPrinter, Severity, WireDiagnostic,
};
pub use lift::lift_lambdas;
pub use solver::{infer_capabilities, infer_capabilities_against};
pub use transform::Transformer;
pub use visitor::Visitor;

/// Invariant violations that abort a pass.
///
/// These never cross the public interface: entry points catch them and
/// return the original program plus an error diagnostic.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PassError {
    /// A lambda's parameter symbol tree cannot be matched against the input
    /// half of its resolved type.
    #[error("lambda parameter pattern `{got}` does not match its input type {expected}")]
    LambdaShape { expected: String, got: String },

    /// A tree rewrite replaced an expression with one of a different
    /// resolved type.
    #[error("tree rewrite changed an expression's type from {original} to {replacement}")]
    TypeInvariant {
        original: String,
        replacement: String,
    },
}

/// Result type for pass internals.
pub type Result<T> = std::result::Result<T, PassError>;

/// Staged facade over the two passes.
///
/// Each stage consumes the previous program and accumulates diagnostics;
/// the program is always usable, failed stages leave it unchanged.
#[derive(Debug, Clone)]
pub struct Compilation {
    program: Program,
    diagnostics: Diagnostics,
}

impl Compilation {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            diagnostics: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn lift_lambdas(mut self) -> Self {
        let (program, diagnostics) = lift::lift_lambdas(&self.program);
        self.program = program;
        self.diagnostics.extend(diagnostics);
        self
    }

    #[must_use]
    pub fn infer_capabilities(mut self) -> Self {
        let (program, diagnostics) = solver::infer_capabilities(&self.program);
        self.program = program;
        self.diagnostics.extend(diagnostics);
        self
    }

    #[must_use]
    pub fn infer_capabilities_against(mut self, target: RuntimeCapability) -> Self {
        let (program, diagnostics) = solver::infer_capabilities_against(&self.program, target);
        self.program = program;
        self.diagnostics.extend(diagnostics);
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Program, Diagnostics) {
        (self.program, self.diagnostics)
    }
}
