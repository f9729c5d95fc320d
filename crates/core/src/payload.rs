//! Analysis payload model.
//!
//! The remote endpoint answers with loosely shaped JSON:
//!
//! ```json
//! { "data": [ { "number": 1, "question_raw": "...", "answer_raw": ["A. ..", "B. .."],
//!               "answer": [true, false], "reason": "...",
//!               "type_question": "single-choice", "accuracy": "85%" } ] }
//! ```
//!
//! Only the outer shape is strict: `data` must be a non-empty array.
//! Individual entries are read leniently, field by field, with the same
//! placeholders the answer view shows for missing values.

use serde_json::Value;
use std::fmt;

/// Placeholder for missing text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Why a payload was rejected as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadError {
    MissingData,
    DataNotASequence,
    EmptyData,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::MissingData => f.write_str("missing `data` field"),
            PayloadError::DataNotASequence => f.write_str("`data` is not a list"),
            PayloadError::EmptyData => f.write_str("`data` is empty"),
        }
    }
}

/// Single- or multiple-answer question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Single,
    Multiple,
}

impl QuestionKind {
    /// `"single-choice"` is single-answer; anything else is treated as
    /// multiple-answer.
    pub fn from_type_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("single-choice") {
            QuestionKind::Single
        } else {
            QuestionKind::Multiple
        }
    }
}

/// Which choices are correct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Correctness {
    /// One flag per choice, matched by position.
    Flags(Vec<bool>),
    /// Labels of the correct choices (e.g. `["A", "C"]`), matched by label.
    Labels(Vec<String>),
    /// The field had a shape that cannot be interpreted.
    Invalid(String),
}

/// One analysed question.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionResult {
    pub number: String,
    pub question_text: String,
    pub answer_choices: Vec<String>,
    pub correctness: Correctness,
    pub explanation: String,
    pub kind: QuestionKind,
    pub confidence: String,
    /// Set when the entry itself was not a JSON object.
    pub malformed: bool,
}

/// A validated analysis response.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisPayload {
    pub data: Vec<QuestionResult>,
}

impl AnalysisPayload {
    /// Validates the outer shape and reads every question.
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let data = value.get("data").ok_or(PayloadError::MissingData)?;
        let entries = data.as_array().ok_or(PayloadError::DataNotASequence)?;
        if entries.is_empty() {
            return Err(PayloadError::EmptyData);
        }

        let data = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| QuestionResult::from_value(entry, idx))
            .collect();
        Ok(Self { data })
    }
}

impl QuestionResult {
    fn from_value(value: &Value, idx: usize) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .filter(|v| !v.is_null())
                .map(display_value)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        let answer_choices = value
            .get("answer_raw")
            .and_then(Value::as_array)
            .map(|choices| choices.iter().map(display_value).collect())
            .unwrap_or_default();

        Self {
            number: value
                .get("number")
                .filter(|v| !v.is_null())
                .map(display_value)
                .unwrap_or_else(|| format!("Q{}", idx + 1)),
            question_text: text("question_raw"),
            answer_choices,
            correctness: Correctness::from_value(value.get("answer")),
            explanation: text("reason"),
            kind: QuestionKind::from_type_name(&text("type_question")),
            confidence: text("accuracy"),
            malformed: !value.is_object(),
        }
    }
}

impl Correctness {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Correctness::Flags(Vec::new()),
            Some(Value::String(label)) => Correctness::Labels(vec![label.clone()]),
            Some(Value::Array(items)) => {
                if items.iter().all(|v| v.is_string()) && !items.is_empty() {
                    Correctness::Labels(items.iter().map(display_value).collect())
                } else if let Some(flags) = items.iter().map(as_flag).collect::<Option<Vec<_>>>() {
                    Correctness::Flags(flags)
                } else {
                    Correctness::Invalid("answer list mixes labels and flags".to_string())
                }
            }
            Some(other) => Correctness::Invalid(format!("unexpected answer value {}", other)),
        }
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

/// Strings are shown without quotes; everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
