use crate::model::bands::PerformanceBand;
use crate::model::schema::{FeatureKind, FeatureSchema};
use crate::pipeline::assess::Assessment;
use crate::report::{format_f64_2, format_scale};

pub fn render_assessment_text(a: &Assessment) -> String {
    let mut out = String::new();

    out.push_str("Employee Performance Prediction\n");
    out.push_str("===============================\n\n");

    match a.score_max {
        Some(max) => out.push_str(&format!(
            "Predicted Performance Rating: {} / {}\n",
            format_f64_2(a.score.value()),
            format_scale(max)
        )),
        None => out.push_str(&format!(
            "Predicted Performance Rating: {}\n",
            format_f64_2(a.score.value())
        )),
    }
    out.push_str(&format!(
        "Band: {} ({})\n\n",
        a.recommendation.headline,
        band_marker(a.band)
    ));
    out.push_str(&format!("Recommendation: {}\n\n", a.recommendation.advice));
    out.push_str("---\n");
    out.push_str(&format!("Prediction powered by model {}.\n", a.model));

    out
}

fn band_marker(band: PerformanceBand) -> &'static str {
    match band {
        PerformanceBand::Excellent => "green",
        PerformanceBand::Good => "yellow",
        PerformanceBand::NeedsSupport => "red",
    }
}

pub fn render_schema_text(schema: &FeatureSchema) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Schema {} ({} features)\n",
        schema.id(),
        schema.len()
    ));
    for (i, spec) in schema.features.iter().enumerate() {
        let kind = match &spec.kind {
            FeatureKind::Integer { min, max } => format!(
                "integer [{}, {}]",
                min.map_or("-".to_string(), |v| v.to_string()),
                max.map_or("-".to_string(), |v| v.to_string())
            ),
            FeatureKind::Float { min, max } => format!(
                "float [{}, {}]",
                min.map_or("-".to_string(), |v| v.to_string()),
                max.map_or("-".to_string(), |v| v.to_string())
            ),
            FeatureKind::Categorical { levels } => format!("category {{{}}}", levels.join(", ")),
        };
        out.push_str(&format!("{:>3}. {} : {}", i + 1, spec.name, kind));
        if let Some(d) = &spec.default {
            out.push_str(&format!(" (default {d})"));
        }
        out.push('\n');
    }
    out
}
