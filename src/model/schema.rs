use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input::{FeatureRecord, FeatureValue};
use crate::model::error::{FieldIssue, SchemaMismatchError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureKind {
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Categorical { levels: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FeatureKind,
    /// Value the input form pre-selects; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FeatureValue>,
}

/// Ordered, typed feature names a model was fit on. The order is the
/// encoding order handed to the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,
    pub version: String,
    pub features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    /// Internal consistency, checked once at load.
    pub fn check(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err(format!("schema {} declares no features", self.id()));
        }
        let mut seen = BTreeSet::new();
        for spec in &self.features {
            if spec.name.trim().is_empty() {
                return Err("schema contains a feature with an empty name".to_string());
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(format!("feature {} is declared twice", spec.name));
            }
            match &spec.kind {
                FeatureKind::Integer {
                    min: Some(lo),
                    max: Some(hi),
                } if lo > hi => {
                    return Err(format!("feature {} has min {lo} > max {hi}", spec.name));
                }
                FeatureKind::Float {
                    min: Some(lo),
                    max: Some(hi),
                } if lo > hi => {
                    return Err(format!("feature {} has min {lo} > max {hi}", spec.name));
                }
                FeatureKind::Categorical { levels } if levels.is_empty() => {
                    return Err(format!("categorical feature {} has no levels", spec.name));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Structural check of a record: every declared field present, nothing
    /// extra, every value of the declared kind and inside declared bounds.
    pub fn validate(&self, record: &FeatureRecord) -> Result<(), SchemaMismatchError> {
        let mut err = SchemaMismatchError {
            schema: self.id(),
            missing: Vec::new(),
            unexpected: Vec::new(),
            invalid: Vec::new(),
        };

        for spec in &self.features {
            match record.get(&spec.name) {
                None => err.missing.push(spec.name.clone()),
                Some(value) => {
                    if let Some(reason) = check_value(&spec.kind, value) {
                        err.invalid.push(FieldIssue {
                            name: spec.name.clone(),
                            reason,
                        });
                    }
                }
            }
        }
        for name in record.names() {
            if self.position(name).is_none() {
                err.unexpected.push(name.to_string());
            }
        }

        if err.is_empty() { Ok(()) } else { Err(err) }
    }

    /// Numeric vector in schema order. Categorical values become the index
    /// of their level.
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>, SchemaMismatchError> {
        self.validate(record)?;
        let mut out = Vec::with_capacity(self.features.len());
        for spec in &self.features {
            let value = record.get(&spec.name);
            let x = match (&spec.kind, value) {
                (FeatureKind::Categorical { levels }, Some(FeatureValue::Category(level))) => {
                    levels.iter().position(|l| l == level).map(|i| i as f64)
                }
                (_, Some(v)) => v.as_f64(),
                (_, None) => None,
            };
            // validate() has already rejected anything that would land here as None
            out.push(x.unwrap_or(f64::NAN));
        }
        Ok(out)
    }

    /// Record pre-filled with every declared default.
    pub fn defaults(&self) -> FeatureRecord {
        let mut record = FeatureRecord::new();
        for spec in &self.features {
            if let Some(v) = &spec.default {
                record.insert(&spec.name, v.clone());
            }
        }
        record
    }
}

fn check_value(kind: &FeatureKind, value: &FeatureValue) -> Option<String> {
    match (kind, value) {
        (FeatureKind::Integer { min, max }, FeatureValue::Int(v)) => {
            out_of_range(*v as f64, min.map(|m| m as f64), max.map(|m| m as f64))
        }
        (FeatureKind::Integer { .. }, other) => {
            Some(format!("expected integer, got {}", other.kind_name()))
        }
        (FeatureKind::Float { min, max }, FeatureValue::Int(_) | FeatureValue::Float(_)) => {
            let v = value.as_f64().unwrap_or(f64::NAN);
            if !v.is_finite() {
                return Some("value is not finite".to_string());
            }
            out_of_range(v, *min, *max)
        }
        (FeatureKind::Float { .. }, other) => {
            Some(format!("expected float, got {}", other.kind_name()))
        }
        (FeatureKind::Categorical { levels }, FeatureValue::Category(level)) => {
            if levels.iter().any(|l| l == level) {
                None
            } else {
                Some(format!(
                    "unknown level {level:?} (expected one of {})",
                    levels.join(", ")
                ))
            }
        }
        (FeatureKind::Categorical { .. }, other) => {
            Some(format!("expected category, got {}", other.kind_name()))
        }
    }
}

fn out_of_range(v: f64, min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(lo), _) if v < lo => Some(format_range(v, min, max)),
        (_, Some(hi)) if v > hi => Some(format_range(v, min, max)),
        _ => None,
    }
}

fn format_range(v: f64, min: Option<f64>, max: Option<f64>) -> String {
    let lo = min.map_or("-inf".to_string(), |m| m.to_string());
    let hi = max.map_or("+inf".to_string(), |m| m.to_string());
    format!("value {v} outside [{lo}, {hi}]")
}

struct BuiltinField {
    name: &'static str,
    min: i64,
    max: i64,
    default: i64,
}

const EMPLOYEE_PERFORMANCE_V1: &[BuiltinField] = &[
    BuiltinField {
        name: "EmpLastSalaryHikePercent",
        min: 0,
        max: 25,
        default: 10,
    },
    BuiltinField {
        name: "EmpEnvironmentSatisfaction",
        min: 1,
        max: 4,
        default: 3,
    },
    BuiltinField {
        name: "EmpJobSatisfaction",
        min: 1,
        max: 4,
        default: 3,
    },
    BuiltinField {
        name: "YearsSinceLastPromotion",
        min: 0,
        max: 15,
        default: 2,
    },
    BuiltinField {
        name: "EmpWorkLifeBalance",
        min: 1,
        max: 4,
        default: 3,
    },
    BuiltinField {
        name: "EmpJobInvolvement",
        min: 1,
        max: 4,
        default: 3,
    },
];

/// The six-field employee form.
pub fn employee_performance_v1() -> FeatureSchema {
    FeatureSchema {
        name: "employee_performance".to_string(),
        version: "1".to_string(),
        features: EMPLOYEE_PERFORMANCE_V1
            .iter()
            .map(|f| FeatureSpec {
                name: f.name.to_string(),
                kind: FeatureKind::Integer {
                    min: Some(f.min),
                    max: Some(f.max),
                },
                default: Some(FeatureValue::Int(f.default)),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/schema.rs"]
mod tests;
