use serde::Serialize;

use crate::input::FeatureRecord;
use crate::model::bands::{PerformanceBand, Recommendation};
use crate::model::error::PredictionError;
use crate::model::{Model, Score};
use crate::pipeline::classify::Scorer;
use crate::pipeline::registry::ModelHandle;

/// Everything the shell renders for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub model: String,
    pub score: Score,
    pub score_max: Option<f64>,
    pub band: PerformanceBand,
    pub recommendation: Recommendation,
}

pub fn assess_with_model(
    model: &Model,
    scorer: &Scorer,
    record: &FeatureRecord,
) -> Result<Assessment, PredictionError> {
    let score = model.predict(record)?;
    let band = scorer.classify(score);
    tracing::info!(
        model = %model.name,
        score = score.value(),
        band = %band,
        "assessed record"
    );
    Ok(Assessment {
        model: format!("{}@{}", model.name, model.version),
        score,
        score_max: model.output_range.map(|(_, hi)| hi),
        band,
        recommendation: scorer.recommend(band).clone(),
    })
}

/// Model adapter and scorer wired together behind one call.
#[derive(Debug, Clone)]
pub struct Predictor {
    handle: ModelHandle,
    scorer: Scorer,
}

impl Predictor {
    pub fn new(handle: ModelHandle, scorer: Scorer) -> Self {
        Self { handle, scorer }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn assess(&self, record: &FeatureRecord) -> Result<Assessment, PredictionError> {
        let model = self
            .handle
            .model()
            .map_err(PredictionError::ModelUnavailable)?;
        assess_with_model(&model, &self.scorer, record)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/assess.rs"]
mod tests;
