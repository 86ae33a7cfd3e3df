//! Diagnostic codes and severities.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic. `Hidden` diagnostics are produced for
/// bookkeeping and suppressed by default renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Hidden => f.write_str("hidden"),
            Severity::Info => f.write_str("info"),
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Every diagnostic the passes can produce.
///
/// Capability codes are emitted as errors when the offending construct is in
/// a source-declared callable, and as warnings when the solver explains a
/// violation inside a referenced library (same code, warning severity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    UnsupportedResultComparison,
    ResultComparisonNotInOperationIf,
    ReturnInResultConditionedBlock,
    SetInResultConditionedBlock,
    UnsupportedClassicalCapability,
    DynamicallySizedArray,
    DynamicArrayUpdate,
    /// Call graph names a callable absent from the resolutions.
    UnknownCallable,
    /// An invariant violation aborted a pass; the original tree was
    /// returned.
    PassFailure,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedResultComparison => "UnsupportedResultComparison",
            Self::ResultComparisonNotInOperationIf => "ResultComparisonNotInOperationIf",
            Self::ReturnInResultConditionedBlock => "ReturnInResultConditionedBlock",
            Self::SetInResultConditionedBlock => "SetInResultConditionedBlock",
            Self::UnsupportedClassicalCapability => "UnsupportedClassicalCapability",
            Self::DynamicallySizedArray => "DynamicallySizedArray",
            Self::DynamicArrayUpdate => "DynamicArrayUpdate",
            Self::UnknownCallable => "UnknownCallable",
            Self::PassFailure => "PassFailure",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Self::UnknownCallable => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// True for codes whose first argument is a required capability name.
    pub fn is_capability_code(self) -> bool {
        !matches!(self, Self::UnknownCallable | Self::PassFailure)
    }

    /// The base message. `arguments` follow the per-code convention:
    /// capability codes lead with the required capability's name.
    pub fn describe(self, arguments: &[String]) -> String {
        let arg = |i: usize| arguments.get(i).map(String::as_str).unwrap_or("?");
        match self {
            Self::UnsupportedResultComparison => format!(
                "comparison of measurement results requires runtime capability {}",
                arg(0)
            ),
            Self::ResultComparisonNotInOperationIf => format!(
                "measurement results may only be compared in the condition of an if statement \
                 within an operation; this comparison requires runtime capability {}",
                arg(0)
            ),
            Self::ReturnInResultConditionedBlock => format!(
                "returning from within a block conditioned on a measurement result requires \
                 runtime capability {}",
                arg(0)
            ),
            Self::SetInResultConditionedBlock => format!(
                "assignment to `{}` within a block conditioned on a measurement result requires \
                 runtime capability {}",
                arg(1),
                arg(0)
            ),
            Self::UnsupportedClassicalCapability => {
                format!("{} requires runtime capability {}", arg(1), arg(0))
            }
            Self::DynamicallySizedArray => format!(
                "dynamically sized array construction requires runtime capability {}",
                arg(0)
            ),
            Self::DynamicArrayUpdate => format!(
                "array update with a dynamic index requires runtime capability {}",
                arg(0)
            ),
            Self::UnknownCallable => {
                format!("call graph references unknown callable `{}`", arg(0))
            }
            Self::PassFailure => format!("internal pass failure: {}", arg(0)),
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
