//! Declaration attributes.

use crate::capability::RuntimeCapability;
use crate::position::Range;

pub const REQUIRES_CAPABILITY: &str = "RequiresCapability";

/// The fixed reason string attached to inferred capability attributes.
pub const INFERRED_REASON: &str = "Inferred automatically by the compiler.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub arguments: Vec<String>,
    pub range: Option<Range>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
            range: None,
        }
    }

    /// `RequiresCapability` with the wire form of exactly two string
    /// arguments: the capability's canonical name and the reason.
    pub fn requires_capability(capability: RuntimeCapability) -> Self {
        Self::new(
            REQUIRES_CAPABILITY,
            vec![capability.to_string(), INFERRED_REASON.to_string()],
        )
    }

    pub fn is_requires_capability(&self) -> bool {
        self.name == REQUIRES_CAPABILITY
    }
}

/// Read an explicit capability requirement off a declaration's attributes.
///
/// Returns `None` when no `RequiresCapability` attribute is present or its
/// first argument is not a known capability name.
pub fn required_capability(attributes: &[Attribute]) -> Option<RuntimeCapability> {
    attributes
        .iter()
        .find(|attr| attr.is_requires_capability())
        .and_then(|attr| attr.arguments.first())
        .and_then(|name| RuntimeCapability::from_name(name))
}
