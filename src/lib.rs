pub mod config;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use input::{FeatureRecord, FeatureValue};
pub use model::bands::{BandThresholds, PerformanceBand, Recommendation};
pub use model::error::{LoadError, PredictionError, SchemaMismatchError};
pub use model::{Model, Score};
pub use pipeline::assess::{Assessment, Predictor};
pub use pipeline::classify::Scorer;
pub use pipeline::registry::{ModelHandle, ModelRegistry};
