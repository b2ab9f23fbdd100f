use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::debug;

use crate::comparator::{ComparisonFailure, Registry};
use crate::kernel::Value;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Expect {
    #[default]
    Equal,
    Unequal,
}

/// One entry of a case file.
#[derive(Clone, Debug, Deserialize)]
pub struct Case {
    pub name: String,
    pub expected: JsonValue,
    pub actual: JsonValue,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub ignore_case: Option<bool>,
    #[serde(default)]
    pub canonicalize: Option<bool>,
    #[serde(default)]
    pub expect: Expect,
}

#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub expect: Expect,
    /// `None` when the values compared equal.
    pub failure: Option<ComparisonFailure>,
    /// Set when the case could not be evaluated at all.
    pub error: Option<String>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.expect {
            Expect::Equal => self.failure.is_none(),
            Expect::Unequal => self.failure.is_some(),
        }
    }
}

/// Reads a YAML or JSON case file; the extension decides.
pub fn load(path: &Path) -> Result<Vec<Case>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read case file {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "json" => parse_json(&content),
        "yaml" | "yml" => parse_yaml(&content),
        other => bail!("unsupported case file extension '{other}' (json|yaml|yml)"),
    }
}

pub fn parse_json(src: &str) -> Result<Vec<Case>> {
    Ok(serde_json::from_str(src)?)
}

pub fn parse_yaml(src: &str) -> Result<Vec<Case>> {
    let yv: YamlValue = serde_yaml::from_str(src)?;
    let json = serde_json::to_value(tag_non_finite(yv))?;
    Ok(serde_json::from_value(json)?)
}

// JSON has no NaN/INF; `.nan`, `.inf` and `-.inf` become `{$float: ...}`
// tags instead of turning into null on the way through serde_json.
fn tag_non_finite(v: YamlValue) -> YamlValue {
    match v {
        YamlValue::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => {
                let tag = if f.is_nan() {
                    "NAN"
                } else if f > 0.0 {
                    "INF"
                } else {
                    "-INF"
                };
                let mut m = Mapping::new();
                m.insert(YamlValue::String("$float".into()), YamlValue::String(tag.into()));
                YamlValue::Mapping(m)
            }
            _ => YamlValue::Number(n),
        },
        YamlValue::Sequence(items) => {
            YamlValue::Sequence(items.into_iter().map(tag_non_finite).collect())
        }
        YamlValue::Mapping(m) => {
            YamlValue::Mapping(m.into_iter().map(|(k, v)| (k, tag_non_finite(v))).collect())
        }
        other => other,
    }
}

pub fn run_cases(reg: &Registry, cases: &[Case]) -> Vec<CaseReport> {
    cases.iter().map(|c| run_case(reg, c)).collect()
}

fn run_case(reg: &Registry, case: &Case) -> CaseReport {
    let mut report = CaseReport {
        name: case.name.clone(),
        expect: case.expect,
        failure: None,
        error: None,
    };
    match evaluate(reg, case) {
        Ok(failure) => report.failure = failure,
        Err(err) => report.error = Some(format!("{err:#}")),
    }
    debug!(case = %report.name, passed = report.passed(), "case evaluated");
    report
}

fn evaluate(reg: &Registry, case: &Case) -> Result<Option<ComparisonFailure>> {
    let expected = Value::from_json(&case.expected)?;
    let actual = Value::from_json(&case.actual)?;
    let mut opts = reg.defaults();
    if let Some(d) = case.delta {
        if !d.is_finite() || d < 0.0 {
            bail!("delta must be a non-negative number, got {d}");
        }
        opts.delta = d;
    }
    if let Some(b) = case.ignore_case {
        opts.ignore_case = b;
    }
    if let Some(b) = case.canonicalize {
        opts.canonicalize = b;
    }
    let c = reg.comparator_for(&expected, &actual)?;
    Ok(c.assert_equals(&expected, &actual, &opts).err())
}
