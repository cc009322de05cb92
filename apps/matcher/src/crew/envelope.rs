//! Result envelopes: `{"<field>": "<text>"}` objects wrapped around agent replies.
//!
//! Reading is best-effort. Anything that is not a JSON object carrying the
//! expected string field falls back to the raw text; it is never an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::llm_client::strip_json_fences;

/// Named fields an agent may wrap its reply in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultField {
    Resume,
    JobDescription,
    MatchSummary,
    ResumeEnhancement,
    CoverLetter,
}

impl ResultField {
    /// The key written by agents.
    pub fn key(self) -> &'static str {
        match self {
            ResultField::Resume => "resume",
            ResultField::JobDescription => "job_description",
            ResultField::MatchSummary => "match_summary",
            ResultField::ResumeEnhancement => "resume_enhancement",
            ResultField::CoverLetter => "cover_letter",
        }
    }

    /// Extra keys accepted on read. The legacy report app wrote its match
    /// summary under a misspelled key; those payloads still display.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ResultField::MatchSummary => &["match_sumamry"],
            _ => &[],
        }
    }
}

/// Serializes `text` under the field's key.
pub fn wrap_field(field: ResultField, text: &str) -> String {
    let mut object = Map::new();
    object.insert(field.key().to_string(), Value::String(text.to_string()));
    Value::Object(object).to_string()
}

/// Returns the field's value if `raw` is an envelope carrying it.
pub fn extract_field(raw: &str, field: ResultField) -> Option<String> {
    let value: Value = serde_json::from_str(strip_json_fences(raw)).ok()?;
    let object = value.as_object()?;

    std::iter::once(field.key())
        .chain(field.aliases().iter().copied())
        .find_map(|key| object.get(key))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

/// Text to show for a result: the field's value when parseable, the raw text otherwise.
pub fn display_text(raw: &str, field: Option<ResultField>) -> String {
    field
        .and_then(|f| extract_field(raw, f))
        .unwrap_or_else(|| raw.to_string())
}
