//! Configuration loading: a flat INI key space plus a typed settings view.

pub mod config;

pub use config::{Configuration, ConfigurationError, Settings};
