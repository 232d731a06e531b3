//! Turn a text-generation reply into candidates.
//!
//! The generator is asked for a JSON list of
//! `{ "type": ..., "text": ..., "scores": { "relevance": ..., <axis>: ... } }`
//! objects, but replies often arrive wrapped in Markdown fences or prose.

use crate::candidate::{coerce_unit, Candidate, CandidateKind};
use crate::error::IntakeError;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

const PREVIEW_CHARS: usize = 100;

/// Parse a generated reply into candidates numbered from zero.
pub fn parse_generated(reply: &str) -> Result<Vec<Candidate>, IntakeError> {
    let cleaned = reply.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let (start, end) = match (cleaned.find('['), cleaned.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(IntakeError::MissingList {
                preview: preview(reply),
            })
        }
    };

    let items: Vec<Value> =
        serde_json::from_str(&cleaned[start..=end]).map_err(|source| IntakeError::InvalidJson {
            source,
            preview: preview(reply),
        })?;

    let candidates: Vec<Candidate> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| from_generated_item(idx as i64, item))
        .collect();

    debug!(count = candidates.len(), "parsed generated candidates");
    Ok(candidates)
}

fn from_generated_item(id: i64, item: &Value) -> Candidate {
    let scores = item.get("scores");
    let attributes: BTreeMap<String, f64> = match scores {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(axis, raw)| (axis.clone(), coerce_unit(Some(raw))))
            .collect(),
        _ => BTreeMap::new(),
    };

    let mut candidate = Candidate::new(
        id,
        item.get("text").and_then(Value::as_str).unwrap_or_default(),
        item.get("type")
            .and_then(Value::as_str)
            .map(CandidateKind::from)
            .unwrap_or_default(),
    );
    candidate.relevance = coerce_unit(scores.and_then(|s| s.get("relevance")));
    candidate.attributes = attributes;
    candidate
}

fn preview(reply: &str) -> String {
    reply.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_reply() {
        let reply = r#"Here you go:
```json
[
  { "type": "Scene Craft", "text": "霧の港", "scores": { "relevance": 0.9, "sensory": 0.7 } },
  { "type": "Character Dynamics", "text": "老船長", "scores": { "relevance": 0.4, "char_voice": 0.8 } }
]
```"#;
        let candidates = parse_generated(reply).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, 0);
        assert_eq!(candidates[0].kind, CandidateKind::SceneCraft);
        assert_eq!(candidates[0].relevance, 0.9);
        assert_eq!(candidates[0].attribute("sensory"), 0.7);
        assert_eq!(candidates[1].id, 1);
        assert_eq!(candidates[1].attribute("char_voice"), 0.8);
        assert!(!candidates[1].selected);
    }

    #[test]
    fn test_missing_scores_default() {
        let candidates = parse_generated(r#"[{"text": "only text"}]"#).unwrap();
        assert_eq!(candidates[0].relevance, 0.5);
        assert_eq!(candidates[0].kind.label(), "Unknown");
        assert!(candidates[0].attributes.is_empty());
    }

    #[test]
    fn test_no_list_is_error() {
        let err = parse_generated("I could not comply.").unwrap_err();
        assert!(matches!(err, IntakeError::MissingList { .. }));
        assert!(err.to_string().contains("I could not comply."));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = parse_generated("[{\"text\": }]").unwrap_err();
        assert!(matches!(err, IntakeError::InvalidJson { .. }));
    }
}
