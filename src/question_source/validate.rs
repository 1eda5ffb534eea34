//! Strict validation of generated question payloads.
//!
//! The service is asked for a JSON array of
//! `{"text", "options": [{"optionText", "consequenceText", "move"}; 3]}`.
//! Anything else is rejected as a whole: a deck is either fully valid or not
//! used at all.

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::QuestionSourceError;
use crate::game::types::{Deck, Question, QuestionOption};

/// Moves outside this range are accepted but logged.
const USUAL_MOVE_RANGE: std::ops::RangeInclusive<i32> = -2..=2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedDeck {
    #[error("{0}")]
    Shape(String),
    #[error("the deck is empty")]
    Empty,
    #[error("question {index}: {reason}")]
    Question { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    text: String,
    options: Vec<RawOption>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    #[serde(rename = "optionText")]
    option_text: String,
    #[serde(rename = "consequenceText")]
    consequence_text: String,
    #[serde(rename = "move")]
    move_delta: i64,
}

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse raw model output into a deck.
pub fn parse_deck(text: &str) -> Result<Deck, QuestionSourceError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| QuestionSourceError::Unparseable(e.to_string()))?;
    Ok(validate_questions(value)?)
}

/// Check an already-parsed JSON value against the question shape.
pub fn validate_questions(value: Value) -> Result<Deck, MalformedDeck> {
    if !value.is_array() {
        return Err(MalformedDeck::Shape("expected a JSON array of questions".to_string()));
    }
    let raw: Vec<RawQuestion> =
        serde_json::from_value(value).map_err(|e| MalformedDeck::Shape(e.to_string()))?;

    let questions = raw
        .into_iter()
        .enumerate()
        .map(|(index, question)| {
            to_question(question).map_err(|reason| MalformedDeck::Question { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Deck::new(questions).map_err(|_| MalformedDeck::Empty)
}

fn to_question(raw: RawQuestion) -> Result<Question, String> {
    let prompt = non_empty(raw.text, "question text")?;

    let count = raw.options.len();
    let options: [RawOption; 3] = raw
        .options
        .try_into()
        .map_err(|_| format!("expected exactly 3 options, got {count}"))?;

    let [a, b, c] = options.map(to_option);
    let options = [a?, b?, c?];

    for option in &options {
        if !USUAL_MOVE_RANGE.contains(&option.move_delta) {
            warn!(
                "[QuestionSource] Option {:?} moves {} squares (usual range is -2..=2)",
                option.label, option.move_delta
            );
        }
    }

    Ok(Question { prompt, options })
}

fn to_option(raw: RawOption) -> Result<QuestionOption, String> {
    Ok(QuestionOption {
        label: non_empty(raw.option_text, "optionText")?,
        consequence: non_empty(raw.consequence_text, "consequenceText")?,
        move_delta: i32::try_from(raw.move_delta)
            .map_err(|_| format!("move {} is out of range", raw.move_delta))?,
    })
}

fn non_empty(value: String, field: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(label: &str, delta: Value) -> Value {
        json!({ "optionText": label, "consequenceText": format!("{label}!"), "move": delta })
    }

    fn question(text: &str) -> Value {
        json!({
            "text": text,
            "options": [option("a", json!(1)), option("b", json!(0)), option("c", json!(-2))]
        })
    }

    /// Question whose first option is `first` and the other two are plain.
    fn led_by(text: &str, first: Value) -> Value {
        json!({ "text": text, "options": [first, option("b", json!(0)), option("c", json!(0))] })
    }

    #[test]
    fn test_valid_payload_becomes_a_deck() {
        let payload = json!([question("What do you eat?"), question("Why?")]);
        let deck = validate_questions(payload).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.questions()[0].prompt, "What do you eat?");
        assert_eq!(deck.questions()[0].options[2].move_delta, -2);
    }

    #[test]
    fn test_code_fences_are_stripped() {
        let text = format!("```json\n{}\n```", json!([question("Q")]));
        assert_eq!(parse_deck(&text).unwrap().len(), 1);
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn test_non_json_is_unparseable() {
        let err = parse_deck("Sure! Here are your questions:").unwrap_err();
        assert!(matches!(err, QuestionSourceError::Unparseable(_)));
    }

    #[test]
    fn test_object_instead_of_array_is_malformed() {
        let err = parse_deck(r#"{"text": "Q"}"#).unwrap_err();
        assert!(matches!(err, QuestionSourceError::Malformed(MalformedDeck::Shape(_))));
    }

    #[test]
    fn test_empty_array_is_malformed() {
        assert_eq!(validate_questions(json!([])), Err(MalformedDeck::Empty));
    }

    #[test]
    fn test_wrong_option_count_is_malformed() {
        let short = json!({
            "text": "Q",
            "options": [option("a", json!(1)), option("b", json!(1))]
        });
        let err = validate_questions(json!([question("ok"), short])).unwrap_err();
        assert_eq!(
            err,
            MalformedDeck::Question {
                index: 1,
                reason: "expected exactly 3 options, got 2".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let missing = json!([{ "text": "Q", "options": [
            { "optionText": "a", "move": 1 }, option("b", json!(0)), option("c", json!(0))
        ] }]);
        assert!(matches!(validate_questions(missing), Err(MalformedDeck::Shape(_))));
    }

    #[test]
    fn test_fractional_or_text_moves_are_not_coerced() {
        let fractional = led_by("Q", option("a", json!(1.5)));
        assert!(validate_questions(json!([fractional])).is_err());
        let text = led_by("Q", option("a", json!("2")));
        assert!(validate_questions(json!([text])).is_err());
    }

    #[test]
    fn test_blank_strings_are_malformed() {
        let blank = led_by("   ", option("a", json!(1)));
        assert!(matches!(
            validate_questions(json!([blank])),
            Err(MalformedDeck::Question { index: 0, .. })
        ));
        let blank_label = led_by("Q", option("", json!(1)));
        assert!(validate_questions(json!([blank_label])).is_err());
    }

    #[test]
    fn test_large_moves_are_kept() {
        let big = led_by("Q", option("a", json!(5)));
        let deck = validate_questions(json!([big])).unwrap();
        assert_eq!(deck.questions()[0].options[0].move_delta, 5);
    }
}
