use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to bring a model artifact into memory.
///
/// Cloneable so a memoized failure can be handed to every later caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("model artifact not found at {path}; ship the artifact or point --model at it")]
    Missing { path: PathBuf },

    #[error("model artifact {path} could not be read: {message}")]
    Io { path: PathBuf, message: String },

    #[error("model artifact {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("model artifact {path} is incompatible: {reason}")]
    Incompatible { path: PathBuf, reason: String },

    #[error("model artifact {path} did not finish loading within {after:?}")]
    Timeout { path: PathBuf, after: Duration },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Missing { path }
            | LoadError::Io { path, .. }
            | LoadError::Corrupt { path, .. }
            | LoadError::Incompatible { path, .. }
            | LoadError::Timeout { path, .. } => path,
        }
    }
}

/// A single field whose value does not fit its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub name: String,
    pub reason: String,
}

/// A feature record does not match the feature set the model was fit on.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct SchemaMismatchError {
    pub schema: String,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
    pub invalid: Vec<FieldIssue>,
}

impl SchemaMismatchError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for SchemaMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record does not match schema {}", self.schema)?;
        let mut sep = ": ";
        if !self.missing.is_empty() {
            write!(f, "{sep}missing fields [{}]", self.missing.join(", "))?;
            sep = "; ";
        }
        if !self.unexpected.is_empty() {
            write!(f, "{sep}unexpected fields [{}]", self.unexpected.join(", "))?;
            sep = "; ";
        }
        for issue in &self.invalid {
            write!(f, "{sep}{}: {}", issue.name, issue.reason)?;
            sep = "; ";
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("model unavailable, refusing to predict: {0}")]
    ModelUnavailable(LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),

    #[error("{family} estimator failed on well-formed input: {message}")]
    Estimator {
        family: &'static str,
        message: String,
    },
}
