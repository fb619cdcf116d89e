use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    NeedsSupport,
    Good,
    Excellent,
}

impl PerformanceBand {
    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceBand::NeedsSupport => "needs_support",
            PerformanceBand::Good => "good",
            PerformanceBand::Excellent => "excellent",
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn band_order() -> &'static [PerformanceBand] {
    &[
        PerformanceBand::NeedsSupport,
        PerformanceBand::Good,
        PerformanceBand::Excellent,
    ]
}

/// Lower bounds of the upper bands. Scores equal to a bound belong to the
/// band above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub excellent_min: f64,
    pub good_min: f64,
}

impl BandThresholds {
    pub fn default_v1() -> Self {
        Self {
            excellent_min: 3.5,
            good_min: 3.0,
        }
    }

    pub fn new(good_min: f64, excellent_min: f64) -> Result<Self, String> {
        let t = Self {
            excellent_min,
            good_min,
        };
        t.check()?;
        Ok(t)
    }

    pub fn check(&self) -> Result<(), String> {
        if !self.good_min.is_finite() || !self.excellent_min.is_finite() {
            return Err("band thresholds must be finite".to_string());
        }
        if self.good_min > self.excellent_min {
            return Err(format!(
                "good_min {} is above excellent_min {}",
                self.good_min, self.excellent_min
            ));
        }
        Ok(())
    }
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub headline: String,
    pub advice: String,
}

/// Advisory text per band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationTable {
    pub excellent: Recommendation,
    pub good: Recommendation,
    pub needs_support: Recommendation,
}

impl RecommendationTable {
    pub fn default_v1() -> Self {
        Self {
            excellent: Recommendation {
                headline: "Excellent Performance Potential!".to_string(),
                advice: "Offer leadership development and stretch assignments, and review \
                         retention incentives so this employee keeps growing with the company."
                    .to_string(),
            },
            good: Recommendation {
                headline: "Good Performer".to_string(),
                advice: "Keep engagement steady with regular feedback and targeted skill \
                         development toward the next level."
                    .to_string(),
            },
            needs_support: Recommendation {
                headline: "Needs Development Support".to_string(),
                advice: "Agree on a development plan with clear goals and schedule closer \
                         check-ins with the manager."
                    .to_string(),
            },
        }
    }

    pub fn get(&self, band: PerformanceBand) -> &Recommendation {
        match band {
            PerformanceBand::Excellent => &self.excellent,
            PerformanceBand::Good => &self.good,
            PerformanceBand::NeedsSupport => &self.needs_support,
        }
    }
}

impl Default for RecommendationTable {
    fn default() -> Self {
        Self::default_v1()
    }
}
