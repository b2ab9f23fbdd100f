// src/comparator/mod.rs
pub mod failure;
pub mod registry;
pub mod strict_scalar;

pub use failure::{ComparisonFailure, FailureSignal, FailureStyle, LegacySignal, Mismatch, ModernSignal};
pub use registry::Registry;
pub use strict_scalar::StrictScalarComparator;

use crate::kernel::Value;

/// Options a host passes with every equality assertion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompareOptions {
    /// Maximum absolute difference between two numbers of the same kind.
    pub delta: f64,
    /// Accepted for the host contract; no comparator here reads it.
    pub canonicalize: bool,
    pub ignore_case: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { delta: 0.0, canonicalize: false, ignore_case: false }
    }
}

impl CompareOptions {
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_canonicalize(mut self, canonicalize: bool) -> Self {
        self.canonicalize = canonicalize;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Equal,
    Unequal(Mismatch),
}

impl Outcome {
    pub fn is_equal(&self) -> bool {
        matches!(self, Outcome::Equal)
    }
}

/// A comparison rule the host registry can select for a pair of values.
pub trait Comparator: Send + Sync {
    fn name(&self) -> &'static str;

    fn accepts(&self, expected: &Value, actual: &Value) -> bool;

    /// Callers must check `accepts` first.
    fn assert_equals(
        &self,
        expected: &Value,
        actual: &Value,
        opts: &CompareOptions,
    ) -> Result<(), ComparisonFailure>;
}
