//! Candidate fragments and their keyed (JSON) form.

use crate::axes::NEUTRAL;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Category of a candidate fragment.
///
/// The two known labels select a target-parameter vector; anything else is
/// kept verbatim so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CandidateKind {
    SceneCraft,
    CharacterDynamics,
    Other(String),
}

impl CandidateKind {
    pub const SCENE_LABEL: &'static str = "Scene Craft";
    pub const CHARACTER_LABEL: &'static str = "Character Dynamics";

    pub fn label(&self) -> &str {
        match self {
            CandidateKind::SceneCraft => Self::SCENE_LABEL,
            CandidateKind::CharacterDynamics => Self::CHARACTER_LABEL,
            CandidateKind::Other(label) => label,
        }
    }

    pub fn is_scene(&self) -> bool {
        matches!(self, CandidateKind::SceneCraft)
    }
}

impl Default for CandidateKind {
    fn default() -> Self {
        CandidateKind::Other("Unknown".into())
    }
}

impl From<String> for CandidateKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            Self::SCENE_LABEL => CandidateKind::SceneCraft,
            Self::CHARACTER_LABEL => CandidateKind::CharacterDynamics,
            _ => CandidateKind::Other(label),
        }
    }
}

impl From<&str> for CandidateKind {
    fn from(label: &str) -> Self {
        CandidateKind::from(label.to_string())
    }
}

impl From<CandidateKind> for String {
    fn from(kind: CandidateKind) -> String {
        kind.label().to_string()
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scored, selectable text fragment.
///
/// Deserialization goes through [`Candidate::from_value`], so malformed
/// optional fields degrade to defaults instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Candidate {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: CandidateKind,
    pub relevance: f64,
    pub attributes: BTreeMap<String, f64>,
    pub selected: bool,
    pub user_rating: i64,
    pub user_adopted: bool,
}

impl Candidate {
    pub fn new(id: i64, text: impl Into<String>, kind: impl Into<CandidateKind>) -> Self {
        Self {
            id,
            text: text.into(),
            kind: kind.into(),
            relevance: NEUTRAL,
            attributes: BTreeMap::new(),
            selected: false,
            user_rating: 0,
            user_adopted: false,
        }
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = clamp_unit(relevance);
        self
    }

    pub fn with_attribute(mut self, axis: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(axis.into(), clamp_unit(value));
        self
    }

    pub fn with_adopted(mut self, adopted: bool) -> Self {
        self.user_adopted = adopted;
        self
    }

    /// Build a candidate from its keyed form, coercing every field.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key);

        let attributes = match field("attributes") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(axis, raw)| (axis.clone(), coerce_unit(Some(raw))))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            id: coerce_int(field("id")),
            text: field("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            kind: field("type")
                .and_then(Value::as_str)
                .map(CandidateKind::from)
                .unwrap_or_default(),
            relevance: coerce_unit(field("relevance")),
            attributes,
            selected: truthy(field("selected")),
            user_rating: coerce_int(field("user_rating")),
            user_adopted: truthy(field("user_adopted")),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Attribute lookup; axes the candidate does not carry read as neutral.
    pub fn attribute(&self, axis: &str) -> f64 {
        self.attributes.get(axis).copied().unwrap_or(NEUTRAL)
    }

    pub fn is_adopted(&self) -> bool {
        self.user_adopted
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

impl From<Value> for Candidate {
    fn from(value: Value) -> Self {
        Candidate::from_value(&value)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}

/// Real in [0, 1]; anything unreadable becomes the midpoint.
pub(crate) fn coerce_unit(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.map(clamp_unit).unwrap_or(NEUTRAL)
}

fn coerce_int(raw: Option<&Value>) -> i64 {
    match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

fn truthy(raw: Option<&Value>) -> bool {
    match raw {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let raw = json!({
            "id": 3,
            "text": "雨の匂いが路地に残っていた。",
            "type": "Scene Craft",
            "relevance": 0.8,
            "attributes": {"sensory": 0.9, "tension": 0.2},
            "selected": true,
            "user_rating": 4,
            "user_adopted": true
        });
        let candidate = Candidate::from_value(&raw);

        assert_eq!(candidate.id, 3);
        assert_eq!(candidate.kind, CandidateKind::SceneCraft);
        assert_eq!(candidate.relevance, 0.8);
        assert_eq!(candidate.attribute("sensory"), 0.9);
        assert!(candidate.selected);
        assert_eq!(candidate.user_rating, 4);
        assert!(candidate.is_adopted());
        assert_eq!(candidate.char_len(), 14);
    }

    #[test]
    fn test_from_value_defaults_missing_fields() {
        let candidate = Candidate::from_value(&json!({}));
        assert_eq!(candidate.id, 0);
        assert_eq!(candidate.text, "");
        assert_eq!(candidate.kind.label(), "Unknown");
        assert_eq!(candidate.relevance, 0.5);
        assert!(candidate.attributes.is_empty());
        assert!(!candidate.selected);
        assert_eq!(candidate.user_rating, 0);
        assert!(!candidate.user_adopted);
    }

    #[test]
    fn test_malformed_values_degrade() {
        let raw = json!({
            "id": "7",
            "relevance": "high",
            "attributes": ["not", "a", "map"],
            "user_rating": 2.9,
            "user_adopted": 1
        });
        let candidate = Candidate::from_value(&raw);
        assert_eq!(candidate.id, 7);
        assert_eq!(candidate.relevance, 0.5);
        assert!(candidate.attributes.is_empty());
        assert_eq!(candidate.user_rating, 2);
        assert!(candidate.user_adopted);

        let raw = json!({"relevance": 3.5, "attributes": {"thought": "0.25", "voice": null}});
        let candidate = Candidate::from_value(&raw);
        assert_eq!(candidate.relevance, 1.0);
        assert_eq!(candidate.attribute("thought"), 0.25);
        assert_eq!(candidate.attribute("voice"), 0.5);
    }

    #[test]
    fn test_unknown_axis_reads_neutral() {
        let candidate = Candidate::new(0, "x", "Character Dynamics");
        assert_eq!(candidate.attribute("char_voice"), 0.5);
    }

    #[test]
    fn test_keyed_form_field_set() {
        let candidate = Candidate::new(1, "abc", "Mystery").with_attribute("tension", 0.4);
        let value = candidate.to_value();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected = vec![
            "id", "text", "type", "relevance", "attributes", "selected", "user_rating",
            "user_adopted",
        ];
        expected.sort();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(sorted, expected);
        assert_eq!(value["type"], "Mystery");

        let parsed: Candidate = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, candidate);
    }
}
