//! Response rendering.
//!
//! Turns an analysis response into an ordered list of [`StyledSegment`]s:
//! a title, then per question its number and text, the choice list with
//! correct answers highlighted, the explanation, and a confidence meter.
//! The renderer knows nothing about widgets; a display implements
//! [`AnswerSurface`] and maps each [`SegmentStyle`] to colours.

use crate::payload::{AnalysisPayload, Correctness, QuestionKind, QuestionResult};
use serde_json::Value;

pub const INVALID_RESPONSE: &str = "Invalid API response format";
pub const TITLE: &str = "EXAM QUESTION ANALYSIS\n";
pub const CHECKED: &str = "☑ ";
pub const UNCHECKED: &str = "☐ ";
pub const METER_CELLS: usize = 5;
const FILLED_CELL: char = '█';
const EMPTY_CELL: char = '░';

/// Confidence classification used for styling the meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    pub fn from_value(value: i64) -> Self {
        if value >= 80 {
            ConfidenceBucket::High
        } else if value >= 50 {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }
}

/// Named visual style of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentStyle {
    Plain,
    Title,
    QuestionNumber,
    QuestionText,
    SectionHeader,
    CorrectAnswer,
    IncorrectAnswer,
    Explanation,
    Confidence,
    Meter(ConfidenceBucket),
    Error,
}

/// A run of text with one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledSegment {
    pub text: String,
    pub style: SegmentStyle,
}

impl StyledSegment {
    pub fn new(text: impl Into<String>, style: SegmentStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Concatenates the text of all segments, e.g. for the clipboard.
pub fn plain_text(segments: &[StyledSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// A display that can show rendered segments.
pub trait AnswerSurface {
    /// Removes previous content and makes the surface writable.
    fn clear(&mut self);
    fn append(&mut self, segment: StyledSegment);
    /// Called once all segments are in: lock editing and scroll to the top.
    fn finish(&mut self);
}

/// Parsed `"<n>%"` confidence value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfidenceMeter {
    pub value: i64,
    pub bucket: ConfidenceBucket,
    pub filled: usize,
}

impl ConfidenceMeter {
    /// Parses a percentage string. Strings without `%` or with a
    /// non-integer number yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.contains('%') {
            return None;
        }
        let value: i64 = raw.trim().trim_matches('%').trim().parse().ok()?;
        let filled = (value / 20).clamp(0, METER_CELLS as i64) as usize;
        Some(Self {
            value,
            bucket: ConfidenceBucket::from_value(value),
            filled,
        })
    }

    pub fn bar(&self) -> String {
        let mut bar = String::with_capacity(METER_CELLS * 3);
        bar.extend(std::iter::repeat_n(FILLED_CELL, self.filled));
        bar.extend(std::iter::repeat_n(EMPTY_CELL, METER_CELLS - self.filled));
        bar
    }
}

/// Label and body of one answer choice.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ChoiceLabel {
    label: String,
    body: String,
    /// The label came from the choice text itself.
    explicit: bool,
}

/// Splits `"<token>. <body>"` when the token enumerates this choice: any
/// number, the letter for its position (`B` at index 1) or the matching
/// roman numeral (`ii`). Abbreviations such as `"Dr. Who"` stay in the body.
/// Otherwise synthesizes `A`..`Z`, then the 1-based position.
fn derive_label(choice: &str, idx: usize) -> ChoiceLabel {
    let trimmed = choice.trim();
    let positional = positional_label(idx);
    if let Some((token, body)) = trimmed.split_once(". ") {
        let token = token.trim();
        if is_enumerator(token, idx, &positional) {
            return ChoiceLabel {
                label: token.to_string(),
                body: body.trim().to_string(),
                explicit: true,
            };
        }
    }

    ChoiceLabel {
        label: positional,
        body: trimmed.to_string(),
        explicit: false,
    }
}

fn positional_label(idx: usize) -> String {
    match u8::try_from(idx) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (idx + 1).to_string(),
    }
}

fn is_enumerator(token: &str, idx: usize, positional: &str) -> bool {
    if token.is_empty() || token.chars().count() > 3 {
        return false;
    }
    token.chars().all(|c| c.is_ascii_digit())
        || token.eq_ignore_ascii_case(positional)
        || token.eq_ignore_ascii_case(&roman(idx + 1))
}

fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 7] =
        [(40, "xl"), (10, "x"), (9, "ix"), (5, "v"), (4, "iv"), (1, "i"), (0, "")];
    let mut out = String::new();
    for (value, digits) in NUMERALS {
        if value == 0 {
            break;
        }
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// True when `body` already opens with `label` as its own token
/// (`"A) Paris"`, `"A: Paris"`), so prefixing it again would duplicate it.
fn already_labelled(body: &str, label: &str) -> bool {
    body.strip_prefix(label)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|next| !next.is_alphanumeric())
}

fn normalize_label(label: &str) -> String {
    label.trim().trim_end_matches(['.', ')']).trim().to_lowercase()
}

/// Stateless renderer for analysis responses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a raw response. An invalid shape yields exactly one segment
    /// reading [`INVALID_RESPONSE`].
    pub fn render(&self, response: &Value) -> Vec<StyledSegment> {
        match AnalysisPayload::from_value(response) {
            Ok(payload) => self.render_payload(&payload),
            Err(e) => {
                tracing::warn!("Rejecting API response: {}", e);
                vec![StyledSegment::new(INVALID_RESPONSE, SegmentStyle::Plain)]
            }
        }
    }

    pub fn render_payload(&self, payload: &AnalysisPayload) -> Vec<StyledSegment> {
        tracing::info!("Rendering API response ({} questions)", payload.data.len());
        let mut out = vec![StyledSegment::new(TITLE, SegmentStyle::Title)];
        for question in &payload.data {
            self.render_question(question, &mut out);
        }
        out
    }

    /// Renders into a display surface and finalizes it.
    pub fn render_into(&self, surface: &mut dyn AnswerSurface, response: &Value) {
        show(surface, self.render(response));
    }

    fn render_question(&self, q: &QuestionResult, out: &mut Vec<StyledSegment>) {
        out.push(StyledSegment::new(
            format!("Question {}:\n", q.number),
            SegmentStyle::QuestionNumber,
        ));

        if q.malformed {
            out.push(error_marker("question entry is not an object"));
            return;
        }

        out.push(StyledSegment::new(
            format!("{}\n\n", q.question_text),
            SegmentStyle::QuestionText,
        ));

        let header = match q.kind {
            QuestionKind::Single => "CHOICES (Single Answer):\n",
            QuestionKind::Multiple => "CHOICES (Multiple Answers):\n",
        };
        out.push(StyledSegment::new(header, SegmentStyle::SectionHeader));

        match self.render_choices(q) {
            Ok(choices) => out.extend(choices),
            Err(reason) => {
                tracing::error!("Question {}: {}", q.number, reason);
                out.push(error_marker(&reason));
                return;
            }
        }

        out.push(StyledSegment::new("EXPLANATION:\n", SegmentStyle::SectionHeader));
        out.push(StyledSegment::new(
            format!("{}\n\n", q.explanation),
            SegmentStyle::Explanation,
        ));

        self.render_confidence(&q.confidence, out);
    }

    fn render_choices(&self, q: &QuestionResult) -> Result<Vec<StyledSegment>, String> {
        let labels: Vec<ChoiceLabel> = q
            .answer_choices
            .iter()
            .enumerate()
            .map(|(i, choice)| derive_label(choice, i))
            .collect();

        let flags: Vec<bool> = match &q.correctness {
            Correctness::Flags(flags) => {
                if flags.len() != labels.len() {
                    return Err(format!(
                        "{} answer choices but {} correctness flags",
                        labels.len(),
                        flags.len()
                    ));
                }
                flags.clone()
            }
            Correctness::Labels(correct) => {
                let wanted: Vec<String> = correct.iter().map(|l| normalize_label(l)).collect();
                let flags: Vec<bool> = labels
                    .iter()
                    .map(|c| wanted.contains(&normalize_label(&c.label)))
                    .collect();
                let matched = flags.iter().filter(|f| **f).count();
                if matched < wanted.len() {
                    tracing::warn!(
                        "Question {}: {} of {} correct labels matched no choice",
                        q.number,
                        wanted.len() - matched,
                        wanted.len()
                    );
                }
                flags
            }
            Correctness::Invalid(reason) => return Err(reason.clone()),
        };

        Ok(labels
            .iter()
            .zip(flags)
            .map(|(choice, correct)| {
                let (glyph, style) = if correct {
                    (CHECKED, SegmentStyle::CorrectAnswer)
                } else {
                    (UNCHECKED, SegmentStyle::IncorrectAnswer)
                };
                let text = if !choice.explicit && already_labelled(&choice.body, &choice.label) {
                    format!("{}{}\n", glyph, choice.body)
                } else {
                    format!("{}{}. {}\n", glyph, choice.label, choice.body)
                };
                StyledSegment::new(text, style)
            })
            .collect())
    }

    fn render_confidence(&self, raw: &str, out: &mut Vec<StyledSegment>) {
        out.push(StyledSegment::new("CONFIDENCE: ", SegmentStyle::SectionHeader));
        match ConfidenceMeter::parse(raw) {
            Some(meter) => {
                out.push(StyledSegment::new(format!("{} ", raw), SegmentStyle::Confidence));
                out.push(StyledSegment::new(
                    format!("{}\n", meter.bar()),
                    SegmentStyle::Meter(meter.bucket),
                ));
            }
            None => out.push(StyledSegment::new(format!("{}\n", raw), SegmentStyle::Confidence)),
        }
    }
}

fn error_marker(reason: &str) -> StyledSegment {
    StyledSegment::new(
        format!("⚠ Could not render this question: {}\n\n", reason),
        SegmentStyle::Error,
    )
}

/// Segments shown when a request produced no usable response.
pub fn failure(message: &str) -> Vec<StyledSegment> {
    vec![StyledSegment::new(format!("Error: {}\n", message), SegmentStyle::Error)]
}

/// Replaces a surface's content with `segments` and finalizes it.
pub fn show(surface: &mut dyn AnswerSurface, segments: Vec<StyledSegment>) {
    surface.clear();
    for segment in segments {
        surface.append(segment);
    }
    surface.finish();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(choices: Value, answer: Value, kind: &str, accuracy: &str) -> Value {
        json!({
            "number": 1,
            "question_raw": "Capital of France?",
            "answer_raw": choices,
            "answer": answer,
            "reason": "Paris is the capital.",
            "type_question": kind,
            "accuracy": accuracy,
        })
    }

    fn texts(segments: &[StyledSegment], style: SegmentStyle) -> Vec<&str> {
        segments
            .iter()
            .filter(|s| s.style == style)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn empty_data_renders_only_the_invalid_message() {
        let segments = ResponseRenderer::new().render(&json!({"data": []}));
        assert_eq!(segments, vec![StyledSegment::new(INVALID_RESPONSE, SegmentStyle::Plain)]);
        assert_eq!(plain_text(&segments), "Invalid API response format");
    }

    #[test]
    fn missing_or_wrong_data_is_invalid() {
        let renderer = ResponseRenderer::new();
        for response in [json!({}), json!({"data": "x"}), json!(null), json!({"error": "boom"})] {
            assert_eq!(plain_text(&renderer.render(&response)), INVALID_RESPONSE);
        }
    }

    #[test]
    fn single_choice_question_marks_correct_answer() {
        let response = json!({"data": [question(
            json!(["A. Paris", "B. London"]),
            json!([true, false]),
            "single-choice",
            "85%",
        )]});
        let segments = ResponseRenderer::new().render(&response);

        assert_eq!(segments[0], StyledSegment::new(TITLE, SegmentStyle::Title));
        assert_eq!(texts(&segments, SegmentStyle::CorrectAnswer), vec!["☑ A. Paris\n"]);
        assert_eq!(texts(&segments, SegmentStyle::IncorrectAnswer), vec!["☐ B. London\n"]);
        assert!(texts(&segments, SegmentStyle::SectionHeader).contains(&"CHOICES (Single Answer):\n"));
    }

    #[test]
    fn other_kinds_use_the_multiple_header() {
        let response = json!({"data": [question(
            json!(["x", "y"]),
            json!([true, true]),
            "multiple-choice",
            "60%",
        )]});
        let segments = ResponseRenderer::new().render(&response);
        assert!(texts(&segments, SegmentStyle::SectionHeader).contains(&"CHOICES (Multiple Answers):\n"));
    }

    #[test]
    fn unlabelled_choices_get_letters() {
        let response = json!({"data": [question(
            json!(["Paris", "London", "Rome"]),
            json!([false, false, true]),
            "single-choice",
            "50%",
        )]});
        let segments = ResponseRenderer::new().render(&response);
        assert_eq!(
            texts(&segments, SegmentStyle::IncorrectAnswer),
            vec!["☐ A. Paris\n", "☐ B. London\n"]
        );
        assert_eq!(texts(&segments, SegmentStyle::CorrectAnswer), vec!["☑ C. Rome\n"]);
    }

    #[test]
    fn numeric_prefix_is_kept_as_label() {
        assert_eq!(
            derive_label("2. London", 0),
            ChoiceLabel { label: "2".into(), body: "London".into(), explicit: true }
        );
    }

    #[test]
    fn abbreviations_are_not_labels() {
        for (choice, idx, label) in [("Mr. Smith", 0, "A"), ("Dr. Who", 1, "B"), ("No. 5", 2, "C"), ("St. Louis", 3, "D")] {
            let derived = derive_label(choice, idx);
            assert_eq!(derived.label, label);
            assert_eq!(derived.body, choice);
            assert!(!derived.explicit);
        }
    }

    #[test]
    fn positional_letters_and_numerals_are_labels() {
        assert_eq!(derive_label("b. London", 1).label, "b");
        assert_eq!(derive_label("iv. Rome", 3).label, "iv");
        assert_eq!(derive_label("C. Rome", 0).label, "A");
        assert_eq!(roman(9), "ix");
        assert_eq!(roman(14), "xiv");
    }

    #[test]
    fn keyed_answer_marks_abbreviated_choice() {
        let response = json!({"data": [question(
            json!(["Mr. Smith", "Dr. Who"]),
            json!(["B"]),
            "single-choice",
            "80%",
        )]});
        let segments = ResponseRenderer::new().render(&response);
        assert_eq!(texts(&segments, SegmentStyle::CorrectAnswer), vec!["☑ B. Dr. Who\n"]);
        assert_eq!(texts(&segments, SegmentStyle::IncorrectAnswer), vec!["☐ A. Mr. Smith\n"]);
    }

    #[test]
    fn labels_past_z_are_numeric() {
        assert_eq!(derive_label("Option", 25).label, "Z");
        assert_eq!(derive_label("Option", 26).label, "27");
    }

    #[test]
    fn existing_label_is_not_repeated() {
        let response = json!({"data": [question(
            json!(["A) Paris", "B: London"]),
            json!([true, false]),
            "single-choice",
            "90%",
        )]});
        let segments = ResponseRenderer::new().render(&response);
        assert_eq!(texts(&segments, SegmentStyle::CorrectAnswer), vec!["☑ A) Paris\n"]);
        assert_eq!(texts(&segments, SegmentStyle::IncorrectAnswer), vec!["☐ B: London\n"]);
    }

    #[test]
    fn label_inside_a_word_still_gets_prefixed() {
        let response = json!({"data": [question(
            json!(["Cat", "Bat", "Cow"]),
            json!([false, false, true]),
            "single-choice",
            "90%",
        )]});
        let segments = ResponseRenderer::new().render(&response);
        assert_eq!(texts(&segments, SegmentStyle::CorrectAnswer), vec!["☑ C. Cow\n"]);
    }

    #[test]
    fn high_confidence_meter() {
        let meter = ConfidenceMeter::parse("85%").unwrap();
        assert_eq!(meter.bucket, ConfidenceBucket::High);
        assert_eq!(meter.filled, 4);
        assert_eq!(meter.bar(), "████░");
    }

    #[test]
    fn low_confidence_meter() {
        let meter = ConfidenceMeter::parse("45%").unwrap();
        assert_eq!(meter.bucket, ConfidenceBucket::Low);
        assert_eq!(meter.bar(), "██░░░");
    }

    #[test]
    fn medium_bucket_and_clamping() {
        assert_eq!(ConfidenceMeter::parse("50%").unwrap().bucket, ConfidenceBucket::Medium);
        assert_eq!(ConfidenceMeter::parse("100%").unwrap().bar(), "█████");
        assert_eq!(ConfidenceMeter::parse("140%").unwrap().filled, METER_CELLS);
        assert_eq!(ConfidenceMeter::parse("-5%").unwrap().filled, 0);
    }

    #[test]
    fn unparseable_confidence_is_shown_raw() {
        assert_eq!(ConfidenceMeter::parse("high"), None);
        assert_eq!(ConfidenceMeter::parse("85.5%"), None);
        assert_eq!(ConfidenceMeter::parse("85"), None);

        let mut out = Vec::new();
        ResponseRenderer::new().render_confidence("about 85.5%", &mut out);
        assert_eq!(out[1], StyledSegment::new("about 85.5%\n", SegmentStyle::Confidence));
    }

    #[test]
    fn confidence_segments_carry_bucket_style() {
        let response = json!({"data": [question(json!(["a"]), json!([true]), "single-choice", "85%")]});
        let segments = ResponseRenderer::new().render(&response);
        let tail: Vec<_> = segments.iter().rev().take(3).rev().cloned().collect();
        assert_eq!(
            tail,
            vec![
                StyledSegment::new("CONFIDENCE: ", SegmentStyle::SectionHeader),
                StyledSegment::new("85% ", SegmentStyle::Confidence),
                StyledSegment::new("████░\n", SegmentStyle::Meter(ConfidenceBucket::High)),
            ]
        );
    }

    #[test]
    fn mismatched_flags_only_fail_their_question() {
        crate::logging::init_test_tracing();
        let response = json!({"data": [
            question(json!(["A. Paris"]), json!([true]), "single-choice", "90%"),
            question(json!(["A. x", "B. y", "C. z"]), json!([true]), "single-choice", "90%"),
            question(json!(["A. Rome"]), json!([true]), "single-choice", "90%"),
        ]});
        let segments = ResponseRenderer::new().render(&response);

        assert_eq!(texts(&segments, SegmentStyle::CorrectAnswer), vec!["☑ A. Paris\n", "☑ A. Rome\n"]);
        let errors = texts(&segments, SegmentStyle::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("3 answer choices but 1 correctness flags"));
        assert_eq!(texts(&segments, SegmentStyle::QuestionNumber).len(), 3);
    }

    #[test]
    fn keyed_answers_match_by_label() {
        let response = json!({"data": [question(
            json!(["A. Paris", "B. London", "C. Lyon"]),
            json!(["a", "C."]),
            "multiple-choice",
            "70%",
        )]});
        let segments = ResponseRenderer::new().render(&response);
        assert_eq!(
            texts(&segments, SegmentStyle::CorrectAnswer),
            vec!["☑ A. Paris\n", "☑ C. Lyon\n"]
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let response = json!({"data": [
            question(json!(["A. Paris", "B. London"]), json!([true, false]), "single-choice", "85%"),
            question(json!(["1. x", "2. y"]), json!([false, true]), "multiple", "n/a"),
        ]});
        let renderer = ResponseRenderer::new();
        assert_eq!(renderer.render(&response), renderer.render(&response));
    }

    #[test]
    fn failures_are_a_single_error_segment() {
        assert_eq!(
            failure("timed out"),
            vec![StyledSegment::new("Error: timed out\n", SegmentStyle::Error)]
        );
    }

    #[derive(Default)]
    struct Transcript {
        segments: Vec<StyledSegment>,
        cleared: usize,
        finished: bool,
    }

    impl AnswerSurface for Transcript {
        fn clear(&mut self) {
            self.cleared += 1;
            self.segments.clear();
            self.finished = false;
        }

        fn append(&mut self, segment: StyledSegment) {
            assert!(!self.finished, "append after finish");
            self.segments.push(segment);
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn render_into_replaces_content_and_finishes() {
        let mut surface = Transcript::default();
        surface.segments.push(StyledSegment::new("stale", SegmentStyle::Plain));

        ResponseRenderer::new().render_into(&mut surface, &json!({"data": []}));

        assert_eq!(surface.cleared, 1);
        assert!(surface.finished);
        assert_eq!(plain_text(&surface.segments), INVALID_RESPONSE);
    }
}
