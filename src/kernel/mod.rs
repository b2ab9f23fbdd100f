// src/kernel/mod.rs
pub mod config;
pub mod exporter;
pub mod values;

pub use config::Config;
pub use exporter::{Exporter, Render};
pub use values::{Handle, Kind, Object, Value};
