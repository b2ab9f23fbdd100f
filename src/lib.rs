//! Strict equality for scalar values in test assertions.
//!
//! [`comparator::StrictScalarComparator`] decides equality without coercing
//! between strings, numbers, booleans and null. Hosts reach it through a
//! [`comparator::Registry`] built from a [`kernel::Config`].

pub mod cases;
pub mod comparator;
pub mod error_style;
pub mod kernel;

pub use comparator::{
    Comparator, CompareOptions, ComparisonFailure, FailureStyle, Outcome, Registry,
    StrictScalarComparator,
};
pub use kernel::{Config, Value};
