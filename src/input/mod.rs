use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod artifact;

/// One attribute value as collected by the interaction shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Category(String),
}

impl FeatureValue {
    /// Coerce raw text the way form widgets do: integer, then float, else a
    /// categorical selection.
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<i64>() {
            return FeatureValue::Int(v);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => FeatureValue::Float(v),
            _ => FeatureValue::Category(raw.to_string()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureValue::Int(_) => "integer",
            FeatureValue::Float(_) => "float",
            FeatureValue::Category(_) => "category",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Category(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v}"),
            FeatureValue::Category(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Int(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Int(value as i64)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Float(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Category(value.to_string())
    }
}

/// The attributes describing one subject to be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    fields: BTreeMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FeatureValue>) -> Option<FeatureValue> {
        self.fields.insert(name.to_string(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy every field of `other` into `self`, replacing existing values.
    pub fn merge(&mut self, other: FeatureRecord) {
        self.fields.extend(other.fields);
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid assignment {0:?} (expected NAME=VALUE)")]
    Assignment(String),
}

pub fn load_record(path: &Path) -> Result<FeatureRecord, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `NAME=VALUE` pair, coercing the value.
pub fn parse_assignment(raw: &str) -> Result<(String, FeatureValue), InputError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| InputError::Assignment(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() || value.trim().is_empty() {
        return Err(InputError::Assignment(raw.to_string()));
    }
    Ok((name.to_string(), FeatureValue::coerce(value)))
}

pub fn record_from_assignments(pairs: &[String]) -> Result<FeatureRecord, InputError> {
    let mut record = FeatureRecord::new();
    for raw in pairs {
        let (name, value) = parse_assignment(raw)?;
        record.insert(&name, value);
    }
    Ok(record)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
