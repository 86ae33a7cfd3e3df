//! Diagnostics infrastructure for the passes.
//!
//! Diagnostics are code + ordered string arguments + range; the message text
//! is derived, never stored. Collection and builder follow the usual
//! report-then-emit shape.

mod code;
mod printer;
mod wire;


use qirin_hir::Range;

pub use code::{DiagnosticCode, Severity};
pub use printer::DiagnosticsPrinter;
pub use wire::{WireDiagnostic, WirePosition, WireRange};

/// A single diagnostic. Ranges are 0-based here; the wire form shifts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub arguments: Vec<String>,
    pub range: Range,
}

impl Diagnostic {
    /// Human-readable message.
    ///
    /// Capability codes at warning severity are the solver's "explain"
    /// diagnostics: their first three arguments name the referenced callee,
    /// its source file, and the offending position inside it, followed by
    /// the original arguments.
    pub fn message(&self) -> String {
        if self.severity == Severity::Warning
            && self.code.is_capability_code()
            && self.arguments.len() >= 3
        {
            let callee = &self.arguments[0];
            let file = &self.arguments[1];
            let position = &self.arguments[2];
            let base = self.code.describe(&self.arguments[3..]);
            return format!("call to `{callee}` ({file} at {position}): {base}");
        }
        self.code.describe(&self.arguments)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn to_wire(&self) -> WireDiagnostic {
        WireDiagnostic::from_diagnostic(self)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] at {}: {}",
            self.severity,
            self.code,
            self.range,
            self.message()
        )
    }
}

/// Collection of diagnostics from one or more passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

/// Builder for one diagnostic.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    diagnostic: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn report(&mut self, code: DiagnosticCode, range: Range) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostic: Diagnostic {
                severity: code.default_severity(),
                code,
                arguments: Vec::new(),
                range,
            },
            diagnostics: self,
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.messages.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_warning)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.messages
    }

    /// The §6 wire form of every collected diagnostic, 1-based positions.
    pub fn to_wire(&self) -> Vec<WireDiagnostic> {
        self.messages.iter().map(Diagnostic::to_wire).collect()
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn severity(mut self, severity: Severity) -> Self {
        self.diagnostic.severity = severity;
        self
    }

    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.diagnostic.arguments.push(argument.into());
        self
    }

    pub fn args(mut self, arguments: impl IntoIterator<Item = String>) -> Self {
        self.diagnostic.arguments.extend(arguments);
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.diagnostic);
    }
}
