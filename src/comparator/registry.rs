use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::comparator::{Comparator, CompareOptions, StrictScalarComparator};
use crate::kernel::{Config, Exporter, Render, Value};

/// Comparators known to the host, newest first.
#[derive(Default)]
pub struct Registry {
    comparators: Vec<Box<dyn Comparator>>,
    defaults: CompareOptions,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    /// Host bootstrap: registers the strict scalar comparator with the
    /// configured failure style and takes default options from config.
    pub fn bootstrap(cfg: &Config) -> Self {
        let mut reg = Self::new();
        reg.defaults = CompareOptions {
            delta: cfg.delta,
            canonicalize: cfg.canonicalize,
            ignore_case: cfg.ignore_case,
        };
        reg.register(Box::new(StrictScalarComparator::with_style(cfg.failure_style)));
        reg
    }

    /// Later registrations take priority over earlier ones.
    pub fn register(&mut self, c: Box<dyn Comparator>) {
        info!(comparator = c.name(), "registering comparator");
        self.comparators.insert(0, c);
    }

    pub fn len(&self) -> usize { self.comparators.len() }

    pub fn is_empty(&self) -> bool { self.comparators.is_empty() }

    pub fn defaults(&self) -> CompareOptions { self.defaults }

    pub fn comparator_for(&self, expected: &Value, actual: &Value) -> Result<&dyn Comparator> {
        let found = self
            .comparators
            .iter()
            .find(|c| c.accepts(expected, actual))
            .map(|c| &**c);
        match found {
            Some(c) => {
                debug!(comparator = c.name(), "selected comparator");
                Ok(c)
            }
            None => {
                let ex = Exporter;
                Err(anyhow!(
                    "no comparator accepts {} and {}",
                    ex.export(expected),
                    ex.export(actual)
                ))
            }
        }
    }

    /// Comparison failures come back as `ComparisonFailure` inside the
    /// `anyhow::Error`; recover them with `downcast_ref`.
    pub fn assert_equals_with(&self, expected: &Value, actual: &Value, opts: &CompareOptions) -> Result<()> {
        let c = self.comparator_for(expected, actual)?;
        c.assert_equals(expected, actual, opts)?;
        Ok(())
    }

    pub fn assert_equals(&self, expected: &Value, actual: &Value) -> Result<()> {
        self.assert_equals_with(expected, actual, &self.defaults)
    }

    pub fn assert_equals_ignoring_case(&self, expected: &Value, actual: &Value) -> Result<()> {
        self.assert_equals_with(expected, actual, &self.defaults.with_ignore_case(true))
    }

    pub fn assert_equals_with_delta(&self, expected: &Value, actual: &Value, delta: f64) -> Result<()> {
        self.assert_equals_with(expected, actual, &self.defaults.with_delta(delta))
    }
}
