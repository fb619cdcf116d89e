use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::model::error::LoadError;
use crate::model::estimator::{Estimator, ForestModel, LinearModel};
use crate::model::schema::FeatureSchema;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum EstimatorSpec {
    Linear(LinearModel),
    Forest(ForestModel),
}

/// On-disk artifact: the estimator parameters together with the schema they
/// were exported against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDoc {
    pub format_version: u32,
    pub name: String,
    pub version: String,
    pub schema: FeatureSchema,
    pub estimator: EstimatorSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_range: Option<(f64, f64)>,
}

pub fn decode_artifact(path: &Path, bytes: &[u8]) -> Result<Model, LoadError> {
    let doc: ArtifactDoc = serde_json::from_slice(bytes).map_err(|e| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    build_model(path, doc)
}

pub fn build_model(path: &Path, doc: ArtifactDoc) -> Result<Model, LoadError> {
    let incompatible = |reason: String| LoadError::Incompatible {
        path: path.to_path_buf(),
        reason,
    };

    if doc.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(incompatible(format!(
            "format version {} is not supported (expected {})",
            doc.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    let estimator: Box<dyn Estimator> = match doc.estimator {
        EstimatorSpec::Linear(m) => {
            m.check().map_err(&incompatible)?;
            Box::new(m)
        }
        EstimatorSpec::Forest(m) => {
            m.check().map_err(&incompatible)?;
            Box::new(m)
        }
    };

    let mut model = Model::from_parts(&doc.name, &doc.version, doc.schema, estimator)
        .map_err(&incompatible)?;
    if let Some((lo, hi)) = doc.output_range {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(incompatible(format!("output range [{lo}, {hi}] is invalid")));
        }
        model = model.with_output_range(lo, hi);
    }
    Ok(model)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/artifact.rs"]
mod tests;
