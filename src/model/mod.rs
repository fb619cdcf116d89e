pub mod artifact;
pub mod bands;
pub mod error;
pub mod estimator;
pub mod schema;

use std::fmt;

use serde::Serialize;

use crate::input::FeatureRecord;
use error::PredictionError;
use estimator::Estimator;
use schema::FeatureSchema;

/// Raw model output before banding.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Only finite values are scores.
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Score(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A loaded, immutable model: the schema it was fit on and its estimator.
#[derive(Debug)]
pub struct Model {
    pub name: String,
    pub version: String,
    pub schema: FeatureSchema,
    /// Inclusive range of meaningful scores, e.g. a 1 to 4 rating.
    pub output_range: Option<(f64, f64)>,
    estimator: Box<dyn Estimator>,
}

impl Model {
    /// Pair a schema with any estimator fit on it.
    pub fn from_parts(
        name: &str,
        version: &str,
        schema: FeatureSchema,
        estimator: Box<dyn Estimator>,
    ) -> Result<Self, String> {
        schema.check()?;
        if estimator.n_features() != schema.len() {
            return Err(format!(
                "{} estimator expects {} features but schema {} declares {}",
                estimator.family(),
                estimator.n_features(),
                schema.id(),
                schema.len()
            ));
        }
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            schema,
            output_range: None,
            estimator,
        })
    }

    pub fn with_output_range(mut self, lo: f64, hi: f64) -> Self {
        self.output_range = Some((lo, hi));
        self
    }

    pub fn family(&self) -> &'static str {
        self.estimator.family()
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<Score, PredictionError> {
        let x = self.schema.encode(record)?;
        let raw = self
            .estimator
            .predict(&x)
            .map_err(|message| PredictionError::Estimator {
                family: self.family(),
                message,
            })?;
        Score::new(raw).ok_or_else(|| PredictionError::Estimator {
            family: self.family(),
            message: format!("estimator produced non-finite output {raw}"),
        })
    }
}
