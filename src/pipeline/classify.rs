use crate::model::Score;
use crate::model::bands::{BandThresholds, PerformanceBand, Recommendation, RecommendationTable};

pub fn classify_score(score: Score, thresholds: &BandThresholds) -> PerformanceBand {
    let v = score.value();
    if v >= thresholds.excellent_min {
        PerformanceBand::Excellent
    } else if v >= thresholds.good_min {
        PerformanceBand::Good
    } else {
        PerformanceBand::NeedsSupport
    }
}

/// Maps scores to bands and bands to advice. Both steps are pure lookups.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    pub thresholds: BandThresholds,
    pub recommendations: RecommendationTable,
}

impl Scorer {
    pub fn new(thresholds: BandThresholds, recommendations: RecommendationTable) -> Self {
        Self {
            thresholds,
            recommendations,
        }
    }

    pub fn classify(&self, score: Score) -> PerformanceBand {
        classify_score(score, &self.thresholds)
    }

    pub fn recommend(&self, band: PerformanceBand) -> &Recommendation {
        self.recommendations.get(band)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/classify.rs"]
mod tests;
