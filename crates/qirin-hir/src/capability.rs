//! The runtime-capability join-semilattice.
//!
//! A capability is a point in the product lattice of two orthogonal axes:
//! how transparent measurement results are to the program, and how much
//! classical computation the target supports. Named points cover the
//! combinations targets actually ship; `combine` (least upper bound) never
//! leaves the named set when its inputs are named.

use serde::{Deserialize, Serialize};

/// How freely a program may inspect measurement results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResultOpacity {
    /// Results may only be returned, never compared.
    Opaque,
    /// Results may be compared inside the condition of an `if` in an
    /// operation, with the branch bodies restricted to quantum effects.
    Controlled,
    /// Results are ordinary values.
    Transparent,
}

/// How much classical computation the target supports alongside quantum
/// execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassicalCompute {
    /// No classical computation beyond program sequencing.
    Empty,
    /// Integer and boolean computation only.
    Integral,
    /// Unrestricted classical computation.
    Full,
}

/// A point in the capability lattice.
///
/// `combine` is the join (pointwise maximum); [`RuntimeCapability::BASE`] is
/// its identity. The operation is associative, commutative, and idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeCapability {
    pub result_opacity: ResultOpacity,
    pub classical_compute: ClassicalCompute,
}

impl RuntimeCapability {
    /// Bottom of the lattice: results opaque, no classical computation.
    pub const BASE: Self = Self::new(ResultOpacity::Opaque, ClassicalCompute::Empty);

    /// Integer feedback on transparent results, no heavy classical types.
    pub const ADAPTIVE_EXECUTION: Self =
        Self::new(ResultOpacity::Transparent, ClassicalCompute::Integral);

    /// Full classical computation, but results stay opaque.
    pub const BASIC_QUANTUM_FUNCTIONALITY: Self =
        Self::new(ResultOpacity::Opaque, ClassicalCompute::Full);

    /// Full classical computation with result comparisons confined to
    /// operation `if` conditions.
    pub const BASIC_MEASUREMENT_FEEDBACK: Self =
        Self::new(ResultOpacity::Controlled, ClassicalCompute::Full);

    /// Top of the lattice.
    pub const FULL_COMPUTATION: Self =
        Self::new(ResultOpacity::Transparent, ClassicalCompute::Full);

    pub const fn new(result_opacity: ResultOpacity, classical_compute: ClassicalCompute) -> Self {
        Self {
            result_opacity,
            classical_compute,
        }
    }

    /// Least upper bound of `self` and `other`.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            result_opacity: self.result_opacity.max(other.result_opacity),
            classical_compute: self.classical_compute.max(other.classical_compute),
        }
    }

    /// Partial order: `self` supports everything `other` requires.
    pub fn implies(self, other: Self) -> bool {
        self.result_opacity >= other.result_opacity
            && self.classical_compute >= other.classical_compute
    }

    /// The canonical name of a named lattice point.
    ///
    /// Joins of named points are always named, so passes that only combine
    /// the constants above can rely on `Some`.
    pub fn name(self) -> Option<&'static str> {
        match (self.result_opacity, self.classical_compute) {
            (ResultOpacity::Opaque, ClassicalCompute::Empty) => Some("Base"),
            (ResultOpacity::Transparent, ClassicalCompute::Integral) => Some("AdaptiveExecution"),
            (ResultOpacity::Opaque, ClassicalCompute::Full) => Some("BasicQuantumFunctionality"),
            (ResultOpacity::Controlled, ClassicalCompute::Full) => {
                Some("BasicMeasurementFeedback")
            }
            (ResultOpacity::Transparent, ClassicalCompute::Full) => Some("FullComputation"),
            _ => None,
        }
    }

    /// Inverse of [`RuntimeCapability::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Base" => Some(Self::BASE),
            "AdaptiveExecution" => Some(Self::ADAPTIVE_EXECUTION),
            "BasicQuantumFunctionality" => Some(Self::BASIC_QUANTUM_FUNCTIONALITY),
            "BasicMeasurementFeedback" => Some(Self::BASIC_MEASUREMENT_FEEDBACK),
            "FullComputation" => Some(Self::FULL_COMPUTATION),
            _ => None,
        }
    }

    /// Every point of the lattice, bottom-up in each axis. Test support and
    /// exhaustive law checking.
    pub fn all_points() -> impl Iterator<Item = Self> {
        const OPACITIES: [ResultOpacity; 3] = [
            ResultOpacity::Opaque,
            ResultOpacity::Controlled,
            ResultOpacity::Transparent,
        ];
        const COMPUTES: [ClassicalCompute; 3] = [
            ClassicalCompute::Empty,
            ClassicalCompute::Integral,
            ClassicalCompute::Full,
        ];
        OPACITIES.into_iter().flat_map(|opacity| {
            COMPUTES
                .into_iter()
                .map(move |compute| Self::new(opacity, compute))
        })
    }
}

impl Default for RuntimeCapability {
    fn default() -> Self {
        Self::BASE
    }
}

impl std::fmt::Display for RuntimeCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:?}+{:?}", self.result_opacity, self.classical_compute),
        }
    }
}
