use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::comparator::failure::FailureStyle;

pub const FILE_NAME: &str = ".strictcmp.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub failure_style: FailureStyle,
    pub delta: f64,
    pub ignore_case: bool,
    pub canonicalize: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            failure_style: FailureStyle::Modern,
            delta: 0.0,
            ignore_case: false,
            canonicalize: false,
            color: true,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_delta(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|d| d.is_finite() && *d >= 0.0)
}

/// User-level config file, used when the root has none.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("strictcmp").join("config.toml"))
}

/// Defaults, then `<root>/.strictcmp.toml` (or the user config file),
/// then `STRICTCMP_*` environment overrides.
pub fn load(root: Option<&Path>) -> Config {
    let user = user_config_path();
    let mut cfg = load_files(root, user.as_deref());
    apply_env_with(&mut cfg, |k| std::env::var(k).ok());
    cfg
}

pub fn load_files(root: Option<&Path>, user: Option<&Path>) -> Config {
    let mut cfg = Config::default();
    let candidate = root
        .map(|r| r.join(FILE_NAME))
        .filter(|p| p.is_file())
        .or_else(|| user.map(Path::to_path_buf).filter(|p| p.is_file()));

    if let Some(path) = candidate {
        match std::fs::read_to_string(&path) {
            Ok(s) => {
                debug!(path = %path.display(), "loading config");
                apply_toml(&mut cfg, &s);
            }
            Err(err) => warn!(path = %path.display(), %err, "config file unreadable, using defaults"),
        }
    }
    cfg
}

pub fn apply_toml(cfg: &mut Config, src: &str) {
    let val = match src.parse::<toml::Value>() {
        Ok(v) => v,
        Err(err) => {
            warn!(%err, "config is not valid TOML, ignoring it");
            return;
        }
    };

    // failure.style ("legacy" | "modern")
    if let Some(s) = val
        .get("failure")
        .and_then(|t| t.get("style"))
        .and_then(|v| v.as_str())
    {
        match s.parse::<FailureStyle>() {
            Ok(style) => cfg.failure_style = style,
            Err(_) => warn!(value = s, "unknown failure.style"),
        }
    }
    // compare.delta (non-negative number; integers allowed)
    if let Some(v) = val.get("compare").and_then(|t| t.get("delta")) {
        let d = v.as_float().or_else(|| v.as_integer().map(|i| i as f64));
        match d.filter(|d| d.is_finite() && *d >= 0.0) {
            Some(d) => cfg.delta = d,
            None => warn!(value = %v, "compare.delta must be a non-negative number"),
        }
    }
    // compare.ignore_case (bool)
    if let Some(b) = val
        .get("compare")
        .and_then(|t| t.get("ignore_case"))
        .and_then(|v| v.as_bool())
    {
        cfg.ignore_case = b;
    }
    // compare.canonicalize (bool)
    if let Some(b) = val
        .get("compare")
        .and_then(|t| t.get("canonicalize"))
        .and_then(|v| v.as_bool())
    {
        cfg.canonicalize = b;
    }
    // report.color (bool)
    if let Some(b) = val
        .get("report")
        .and_then(|t| t.get("color"))
        .and_then(|v| v.as_bool())
    {
        cfg.color = b;
    }
}

/// Env overrides through an injectable lookup.
pub fn apply_env_with<F>(cfg: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(s) = lookup("STRICTCMP_FAILURE_STYLE") {
        match s.parse::<FailureStyle>() {
            Ok(style) => cfg.failure_style = style,
            Err(_) => warn!(value = %s, "ignoring STRICTCMP_FAILURE_STYLE"),
        }
    }
    if let Some(s) = lookup("STRICTCMP_DELTA") {
        match parse_delta(&s) {
            Some(d) => cfg.delta = d,
            None => warn!(value = %s, "ignoring STRICTCMP_DELTA"),
        }
    }
    if let Some(b) = lookup("STRICTCMP_IGNORE_CASE").as_deref().and_then(parse_bool) {
        cfg.ignore_case = b;
    }
    if let Some(b) = lookup("STRICTCMP_CANONICALIZE").as_deref().and_then(parse_bool) {
        cfg.canonicalize = b;
    }
    if let Some(b) = lookup("STRICTCMP_COLOR").as_deref().and_then(parse_bool) {
        cfg.color = b;
    }
}
