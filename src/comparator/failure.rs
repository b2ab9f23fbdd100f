use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use thiserror::Error;

use crate::kernel::Value;

/// Shape of the failure the host expects. Older hosts carry an
/// `identical` flag and a bare diff header; newer ones add a hunk marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureStyle {
    Legacy,
    Modern,
}

impl FromStr for FailureStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(FailureStyle::Legacy),
            "modern" => Ok(FailureStyle::Modern),
            other => bail!("unknown failure style '{other}' (expected legacy|modern)"),
        }
    }
}

impl fmt::Display for FailureStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureStyle::Legacy => "legacy",
            FailureStyle::Modern => "modern",
        })
    }
}

/// Payload of an unequal comparison. `expected`/`actual` are the values the
/// caller passed in, never the case-folded copies.
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    pub expected: Value,
    pub actual: Value,
    /// Empty unless both operands are strings.
    pub expected_rendered: String,
    pub actual_rendered: String,
    pub message: String,
}

impl Mismatch {
    pub fn has_diff(&self) -> bool {
        !self.expected_rendered.is_empty() || !self.actual_rendered.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{message}")]
pub struct ComparisonFailure {
    pub expected: Value,
    pub actual: Value,
    pub expected_as_string: String,
    pub actual_as_string: String,
    pub message: String,
    /// Only set by the legacy signal.
    pub identical: Option<bool>,
    pub style: FailureStyle,
}

impl ComparisonFailure {
    /// Unified line diff of the rendered operands; empty when the failure
    /// carries no rendered forms.
    pub fn diff(&self) -> String {
        if self.expected_as_string.is_empty() && self.actual_as_string.is_empty() {
            return String::new();
        }
        let mut out = String::from("--- Expected\n+++ Actual\n");
        if self.style == FailureStyle::Modern {
            out.push_str("@@ @@\n");
        }
        for line in line_diff(&self.expected_as_string, &self.actual_as_string) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn to_report(&self) -> String {
        let diff = self.diff();
        if diff.is_empty() {
            self.message.clone()
        } else {
            format!("{}\n{}", self.message, diff)
        }
    }
}

/// Turns a mismatch into the failure value the host understands.
pub trait FailureSignal: Send + Sync {
    fn style(&self) -> FailureStyle;
    fn raise(&self, mismatch: Mismatch) -> ComparisonFailure;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LegacySignal;

#[derive(Clone, Copy, Debug, Default)]
pub struct ModernSignal;

impl FailureSignal for LegacySignal {
    fn style(&self) -> FailureStyle { FailureStyle::Legacy }

    fn raise(&self, m: Mismatch) -> ComparisonFailure {
        ComparisonFailure {
            expected: m.expected,
            actual: m.actual,
            expected_as_string: m.expected_rendered,
            actual_as_string: m.actual_rendered,
            message: m.message,
            identical: Some(false),
            style: FailureStyle::Legacy,
        }
    }
}

impl FailureSignal for ModernSignal {
    fn style(&self) -> FailureStyle { FailureStyle::Modern }

    fn raise(&self, m: Mismatch) -> ComparisonFailure {
        ComparisonFailure {
            expected: m.expected,
            actual: m.actual,
            expected_as_string: m.expected_rendered,
            actual_as_string: m.actual_rendered,
            message: m.message,
            identical: None,
            style: FailureStyle::Modern,
        }
    }
}

pub fn signal_for(style: FailureStyle) -> Box<dyn FailureSignal> {
    match style {
        FailureStyle::Legacy => Box::new(LegacySignal),
        FailureStyle::Modern => Box::new(ModernSignal),
    }
}

// LCS over lines; ' ' kept, '-' expected only, '+' actual only.
fn line_diff(expected: &str, actual: &str) -> Vec<String> {
    let a: Vec<&str> = expected.lines().collect();
    let b: Vec<&str> = actual.lines().collect();
    let (n, m) = (a.len(), b.len());

    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            out.push(format!(" {}", a[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(format!("-{}", a[i]));
            i += 1;
        } else {
            out.push(format!("+{}", b[j]));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|l| format!("-{l}")));
    out.extend(b[j..].iter().map(|l| format!("+{l}")));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch(exp: &str, act: &str) -> Mismatch {
        Mismatch {
            expected: Value::Str(exp.into()),
            actual: Value::Str(act.into()),
            expected_rendered: format!("'{exp}'"),
            actual_rendered: format!("'{act}'"),
            message: "Failed asserting that two strings are equal.".into(),
        }
    }

    #[test]
    fn legacy_and_modern_shapes() {
        let legacy = LegacySignal.raise(mismatch("foo", "bar"));
        assert_eq!(legacy.identical, Some(false));
        assert_eq!(legacy.diff(), "--- Expected\n+++ Actual\n-'foo'\n+'bar'\n");

        let modern = ModernSignal.raise(mismatch("foo", "bar"));
        assert_eq!(modern.identical, None);
        assert_eq!(modern.diff(), "--- Expected\n+++ Actual\n@@ @@\n-'foo'\n+'bar'\n");
        assert_eq!(modern.to_string(), "Failed asserting that two strings are equal.");
    }

    #[test]
    fn no_rendered_forms_means_no_diff() {
        let f = ModernSignal.raise(Mismatch {
            expected: Value::Str("foo".into()),
            actual: Value::Bool(false),
            expected_rendered: String::new(),
            actual_rendered: String::new(),
            message: "Failed asserting that false matches expected 'foo'.".into(),
        });
        assert_eq!(f.diff(), "");
        assert_eq!(f.to_report(), "Failed asserting that false matches expected 'foo'.");
    }

    #[test]
    fn multiline_diff_keeps_common_lines() {
        let lines = line_diff("'a\nb\nc'", "'a\nx\nc'");
        assert_eq!(lines, vec![" 'a", "-b", "+x", " c'"]);
    }

    #[test]
    fn style_parsing() {
        assert_eq!("Legacy".parse::<FailureStyle>().ok(), Some(FailureStyle::Legacy));
        assert_eq!(" modern ".parse::<FailureStyle>().ok(), Some(FailureStyle::Modern));
        assert!("v9".parse::<FailureStyle>().is_err());
        assert_eq!(signal_for(FailureStyle::Legacy).style(), FailureStyle::Legacy);
    }
}
