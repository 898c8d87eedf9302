//! JSON rendering for envelopes and model-store summaries.
//!
//! stdout carries nothing but these documents, one per line unless pretty
//! printing is requested.

use serde::Serialize;

use crate::domain::{CategoricalField, ResponseEnvelope};
use crate::io::artifacts::Artifacts;

/// Render an envelope as a single JSON line (or indented when `pretty`).
pub fn format_envelope(envelope: &ResponseEnvelope, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    };
    // Envelopes hold only strings and finite numbers, so rendering cannot fail;
    // keep a valid document on stdout even if that ever changes.
    rendered.unwrap_or_else(|e| format!("{{\"success\":false,\"error\":\"failed to render response: {e}\"}}"))
}

#[derive(Debug, Serialize)]
pub struct EncoderSummary {
    pub field: CategoricalField,
    pub known_labels: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub target: String,
    pub model: String,
}

/// What a loaded model store contains.
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub encoders: Vec<EncoderSummary>,
    pub models: Vec<ModelSummary>,
}

pub fn summarize_store(artifacts: &Artifacts) -> StoreSummary {
    let encoders = CategoricalField::ALL
        .into_iter()
        .map(|field| EncoderSummary {
            field,
            known_labels: artifacts.encoders.get(field).map(|e| e.len()),
        })
        .collect();
    let models = artifacts
        .models
        .iter()
        .map(|(target, model)| ModelSummary {
            target: target.to_string(),
            model: model.describe(),
        })
        .collect();
    StoreSummary { encoders, models }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PredictionResult;
    use crate::testing::fixture_artifacts;

    #[test]
    fn compact_envelope_is_one_line() {
        let line = format_envelope(&ResponseEnvelope::success(PredictionResult::fallback()), false);
        assert!(!line.contains('\n'));
        assert_eq!(
            line,
            r#"{"success":true,"predictions":{"min_price":2000.0,"max_price":3000.0,"modal_price":2500.0}}"#
        );
    }

    #[test]
    fn store_summary_lists_every_field_and_target() {
        let summary = summarize_store(&fixture_artifacts());
        assert_eq!(summary.encoders.len(), 3);
        assert!(summary.encoders.iter().all(|e| e.known_labels == Some(2)));
        let targets: Vec<_> = summary.models.iter().map(|m| m.target.as_str()).collect();
        assert_eq!(targets, ["min_price", "max_price", "modal_price"]);
        assert_eq!(summary.models[0].model, "1 trees (reg:squarederror)");
        assert!(summary.models[2].model.starts_with("linear"));
    }
}
