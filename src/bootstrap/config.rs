use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use ini::{Ini, ParseOption};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Configuration file does not exist")]
    NotFound { path: PathBuf },
    #[error("Configuration file {} could not be parsed: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Key/value settings read from an INI file.
///
/// Section headers only group keys visually: every key lands in one flat
/// map and a later duplicate replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    values: IndexMap<String, String>,
}

impl Configuration {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigurationError::NotFound { path: path.to_path_buf() });
        }
        let ini = Ini::load_from_file_opt(path, Self::parse_option())
            .map_err(|e| ConfigurationError::Parse { path: path.to_path_buf(), message: e.to_string() })?;
        let cfg = Self::flatten(&ini);
        debug!(target: "ulpf::bootstrap", "configuration: loaded {} keys from '{}'", cfg.values.len(), path.display());
        Ok(cfg)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let ini = Ini::load_from_str_opt(text, Self::parse_option())
            .map_err(|e| ConfigurationError::Parse { path: PathBuf::from("<memory>"), message: e.to_string() })?;
        Ok(Self::flatten(&ini))
    }

    // Backslashes are literal so Windows paths survive.
    fn parse_option() -> ParseOption { ParseOption { enabled_escape: false, ..ParseOption::default() } }

    fn flatten(ini: &Ini) -> Self {
        let mut values = IndexMap::new();
        for (_section, props) in ini.iter() {
            for (k, v) in props.iter() {
                values.insert(k.to_string(), v.to_string());
            }
        }
        Self { values }
    }

    /// Raw value as written; missing keys are `None`.
    ///
    /// Boolean spellings such as `On` or `no` are returned untouched, not
    /// folded to `"1"`/`""`. Use [`Configuration::get_bool`] to interpret them.
    pub fn get(&self, name: &str) -> Option<&str> { self.values.get(name).map(String::as_str) }

    /// Boolean value using the usual INI spellings; unrecognised text is `None`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)?.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "none" | "" => Some(false),
            _ => None,
        }
    }

    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> { self.get(name)?.trim().parse().ok() }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

/// Typed view over the keys the framework itself understands.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Root directory for the file store (`file_root`)
    pub file_root: Option<PathBuf>,
    /// Include error details in 500 responses (`debug`)
    pub debug: bool,
    /// Fallback tracing filter when RUST_LOG is unset (`log_filter`)
    pub log_filter: String,
    /// Field separator for CSV reads (`csv_delimiter`, first byte)
    pub csv_delimiter: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_root: None,
            debug: false,
            log_filter: "info".to_string(),
            csv_delimiter: b',',
        }
    }
}

impl Settings {
    pub fn from_configuration(cfg: &Configuration) -> Self {
        let d = Self::default();
        Self {
            file_root: cfg.get("file_root").filter(|s| !s.trim().is_empty()).map(PathBuf::from),
            debug: cfg.get_bool("debug").unwrap_or(d.debug),
            log_filter: cfg.get("log_filter").map(str::to_string).unwrap_or(d.log_filter),
            csv_delimiter: cfg
                .get("csv_delimiter")
                .and_then(|s| s.as_bytes().first().copied())
                .unwrap_or(d.csv_delimiter),
        }
    }
}
