use tracing::debug;

use crate::comparator::failure::{FailureSignal, FailureStyle, Mismatch, ModernSignal, signal_for};
use crate::comparator::{Comparator, CompareOptions, ComparisonFailure, Outcome};
use crate::kernel::{Exporter, Render, Value};

/// Compares scalar values without any coercion between kinds.
///
/// `"0"` never equals `0`, `null` never equals `false`, and `0` never equals
/// `0.0`. Numbers of the same kind may differ by at most `delta`. Strings can
/// be compared case-insensitively. Lists, maps, objects and handles are not
/// accepted and are left to other comparators.
pub struct StrictScalarComparator<R: Render = Exporter> {
    exporter: R,
    signal: Box<dyn FailureSignal>,
}

impl StrictScalarComparator {
    pub fn new() -> Self {
        Self { exporter: Exporter, signal: Box::new(ModernSignal) }
    }

    pub fn with_style(style: FailureStyle) -> Self {
        Self { exporter: Exporter, signal: signal_for(style) }
    }
}

impl Default for StrictScalarComparator {
    fn default() -> Self { Self::new() }
}

impl<R: Render> StrictScalarComparator<R> {
    pub fn with_parts(exporter: R, signal: Box<dyn FailureSignal>) -> Self {
        Self { exporter, signal }
    }

    pub fn style(&self) -> FailureStyle {
        self.signal.style()
    }

    /// The decision alone, without raising anything.
    pub fn compare(&self, expected: &Value, actual: &Value, opts: &CompareOptions) -> Outcome {
        let exp_cmp = fold(expected, opts.ignore_case);
        let act_cmp = fold(actual, opts.ignore_case);

        if identical(&exp_cmp, &act_cmp) {
            return Outcome::Equal;
        }

        if expected.kind() != actual.kind() {
            debug!(
                expected = expected.kind().name(),
                actual = actual.kind().name(),
                "kind mismatch"
            );
            return Outcome::Unequal(self.plain_mismatch(expected, actual));
        }

        if let (Some(e), Some(a)) = (expected.as_number(), actual.as_number()) {
            if within_delta(expected, actual, e, a, opts.delta) {
                debug!(delta = opts.delta, "numbers equal within delta");
                return Outcome::Equal;
            }
            return Outcome::Unequal(self.plain_mismatch(expected, actual));
        }

        if let (Value::Str(_), Value::Str(_)) = (expected, actual) {
            return Outcome::Unequal(Mismatch {
                expected: expected.clone(),
                actual: actual.clone(),
                expected_rendered: self.exporter.export(expected),
                actual_rendered: self.exporter.export(actual),
                message: "Failed asserting that two strings are equal.".to_string(),
            });
        }

        Outcome::Unequal(self.plain_mismatch(expected, actual))
    }

    fn plain_mismatch(&self, expected: &Value, actual: &Value) -> Mismatch {
        Mismatch {
            expected: expected.clone(),
            actual: actual.clone(),
            expected_rendered: String::new(),
            actual_rendered: String::new(),
            message: format!(
                "Failed asserting that {} matches expected {}.",
                self.exporter.export(actual),
                self.exporter.export(expected)
            ),
        }
    }
}

impl<R: Render> Comparator for StrictScalarComparator<R> {
    fn name(&self) -> &'static str { "strict-scalar" }

    fn accepts(&self, expected: &Value, actual: &Value) -> bool {
        expected.is_scalar() && actual.is_scalar()
    }

    fn assert_equals(
        &self,
        expected: &Value,
        actual: &Value,
        opts: &CompareOptions,
    ) -> Result<(), ComparisonFailure> {
        match self.compare(expected, actual, opts) {
            Outcome::Equal => Ok(()),
            Outcome::Unequal(m) => Err(self.signal.raise(m)),
        }
    }
}

fn fold(v: &Value, ignore_case: bool) -> Value {
    match v {
        Value::Str(s) if ignore_case => Value::Str(s.to_lowercase()),
        other => other.clone(),
    }
}

// Same kind, same value. NaN is never identical to anything.
fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        _ => false,
    }
}

fn within_delta(expected: &Value, actual: &Value, e: f64, a: f64, delta: f64) -> bool {
    let diff = match (expected, actual) {
        // exact for any pair of i64s
        (Value::Int(x), Value::Int(y)) => (i128::from(*x) - i128::from(*y)).unsigned_abs() as f64,
        _ => (e - a).abs(),
    };
    diff <= delta
}
