use serde::Serialize;

use crate::model::schema::FeatureSchema;
use crate::pipeline::assess::Assessment;

#[derive(Serialize)]
struct AssessmentEnvelope<'a> {
    tool: &'static str,
    tool_version: &'static str,
    assessment: &'a Assessment,
}

pub fn render_assessment_json(a: &Assessment) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AssessmentEnvelope {
        tool: "perfscore",
        tool_version: env!("CARGO_PKG_VERSION"),
        assessment: a,
    })
}

pub fn render_schema_json(schema: &FeatureSchema) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(schema)
}
