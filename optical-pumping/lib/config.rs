//! Optional TOML run card for the batch analyses.
//!
//! Every key is optional and overrides a caller-supplied default; a missing
//! file leaves the defaults untouched. Parsed by hand from [`toml::Value`]
//! so a malformed card fails loudly instead of half-applying.

use std::{ io, path::{ Path, PathBuf } };
use thiserror::Error;
use crate::{ batch::CacheMode, spike::ScanConfig };

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read run card {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("couldn't parse run card: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("run card: expected {expected} for `{key}`")]
    BadValue { key: &'static str, expected: &'static str },

    #[error("run card: unknown cache mode {0:?} \
        (one of: recompute, reuse-if-present, reuse-or-fail)")]
    BadMode(String),
}

/// Settings for a batch analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunCard {
    /// Directory holding the campaign's CSV runs.
    pub data_dir: PathBuf,
    /// Path of the results cache.
    pub cache_file: PathBuf,
    pub mode: CacheMode,
    pub scan: ScanConfig,
}

impl RunCard {
    /// Read a run card from `path`, starting from `defaults`; a missing
    /// file returns the defaults unchanged.
    pub fn load(path: &Path, defaults: Self) -> Result<Self, ConfigError> {
        if !path.exists() { return Ok(defaults); }
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_toml_str(&text, defaults)
    }

    /// Parse run card text, overriding `defaults` key by key.
    pub fn from_toml_str(text: &str, defaults: Self) -> Result<Self, ConfigError> {
        let value: toml::Value = text.parse()?;
        let table = value.as_table()
            .ok_or(ConfigError::BadValue { key: "<root>", expected: "a table" })?;
        let mut card = defaults;
        if let Some(v) = table.get("data_dir") {
            card.data_dir = v.as_str()
                .map(PathBuf::from)
                .ok_or(ConfigError::BadValue {
                    key: "data_dir", expected: "a string" })?;
        }
        if let Some(v) = table.get("cache_file") {
            card.cache_file = v.as_str()
                .map(PathBuf::from)
                .ok_or(ConfigError::BadValue {
                    key: "cache_file", expected: "a string" })?;
        }
        if let Some(v) = table.get("mode") {
            let name = v.as_str()
                .ok_or(ConfigError::BadValue {
                    key: "mode", expected: "a string" })?;
            card.mode = CacheMode::from_name(name)
                .ok_or_else(|| ConfigError::BadMode(name.to_string()))?;
        }
        if let Some(v) = table.get("scan") {
            let scan = v.as_table()
                .ok_or(ConfigError::BadValue {
                    key: "scan", expected: "a table" })?;
            if let Some(t) = scan.get("threshold") {
                card.scan.threshold = float_of(t)
                    .ok_or(ConfigError::BadValue {
                        key: "scan.threshold", expected: "a number" })?;
            }
            if let Some(l) = scan.get("lookahead") {
                card.scan.lookahead = l.as_integer()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or(ConfigError::BadValue {
                        key: "scan.lookahead",
                        expected: "a non-negative integer" })?;
            }
        }
        Ok(card)
    }
}

// toml floats may be written as integers (`threshold = -4`)
fn float_of(value: &toml::Value) -> Option<f64> {
    value.as_float().or_else(|| value.as_integer().map(|n| n as f64))
}
