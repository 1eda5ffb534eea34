//! Question source backed by the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Value};

use super::validate::{parse_deck, MalformedDeck};
use super::{QuestionRequest, QuestionSource, QuestionSourceError};
use crate::config::question_source::{MAX_RESPONSE_BYTES, REQUEST_TIMEOUT_SECS, SAFETY_SETTINGS};
use crate::game::types::Deck;

#[derive(Debug, Clone)]
pub struct GeminiSource {
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiSource {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Prompt asking for `count` multiple-choice board game questions.
pub fn build_prompt(request: &QuestionRequest) -> String {
    format!(
        r#"You write practice material for English-as-a-second-language board games.
Create {count} multiple-choice questions for a student at level {level}.
Topic: {topic}
Grammar/structure focus: {structure}

Rules:
1. Every question must practise the structure above, stay on the topic, and use vocabulary suited to the level.
2. Every question has exactly 3 options. Each option is a short answer a student could give.
3. Every option has a one-sentence consequence describing what happens on the board, and a "move" between -2 and 2.
   Good, natural answers move forward; awkward or wrong ones move back or stay (0).

Return ONLY a JSON array, no markdown and no commentary. Each element looks like:
{{"text": "What did you eat yesterday?", "options": [
  {{"optionText": "I ate pasta.", "consequenceText": "Great past simple! Move ahead.", "move": 2}},
  {{"optionText": "I eat pasta.", "consequenceText": "Careful with the tense.", "move": -1}},
  {{"optionText": "Pasta.", "consequenceText": "Try a full sentence next time.", "move": 0}}
]}}"#,
        count = request.count,
        level = request.level.label(),
        topic = request.topic,
        structure = request.structure,
    )
}

fn request_body(prompt: &str) -> Value {
    let safety: Vec<Value> = SAFETY_SETTINGS
        .iter()
        .map(|(category, threshold)| json!({ "category": category, "threshold": threshold }))
        .collect();
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "safetySettings": safety,
        "generationConfig": { "responseMimeType": "application/json" },
    })
}

/// Concatenated text of the first candidate, if it has any.
fn candidate_text(response: &GenerateContentResponse) -> Option<String> {
    let parts = &response.candidates.first()?.content.as_ref()?.parts;
    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    (!text.trim().is_empty()).then_some(text)
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[async_trait(?Send)]
impl QuestionSource for GeminiSource {
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Deck, QuestionSourceError> {
        info!(
            "[QuestionSource] Generating {} questions. Topic: {}, Level: {}, Structure: {}",
            request.count, request.topic, request.level.code(), request.structure
        );

        let client = awc::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .finish();
        let mut response = client
            .post(self.endpoint())
            .insert_header(("x-goog-api-key", self.api_key.as_str()))
            .send_json(&request_body(&build_prompt(request)))
            .await
            .map_err(|e| QuestionSourceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .body()
            .limit(MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| QuestionSourceError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(QuestionSourceError::Status {
                status: status.as_u16(),
                body: snippet(&String::from_utf8_lossy(&body)),
            });
        }

        let payload: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| QuestionSourceError::Unparseable(e.to_string()))?;
        let text = candidate_text(&payload)
            .ok_or_else(|| MalformedDeck::Shape("response has no candidate text".to_string()))?;
        debug!("[QuestionSource] Raw response snippet: {}...", snippet(&text));

        let deck = parse_deck(&text)?;
        info!("[QuestionSource] Generated {} questions (asked for {})", deck.len(), request.count);
        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Level;

    fn request() -> QuestionRequest {
        QuestionRequest {
            topic: "Hobbies".to_string(),
            level: Level::B1,
            structure: "going to".to_string(),
            count: 12,
        }
    }

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let source = GeminiSource::new("key", "https://api.test/", "gemini-x");
        assert_eq!(source.endpoint(), "https://api.test/v1beta/models/gemini-x:generateContent");
    }

    #[test]
    fn test_prompt_carries_the_form() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Create 12 multiple-choice questions"));
        assert!(prompt.contains("B1 - Pre-Intermediate"));
        assert!(prompt.contains("Topic: Hobbies"));
        assert!(prompt.contains("focus: going to"));
        assert!(prompt.contains(r#""optionText""#));
    }

    #[test]
    fn test_request_body_sends_safety_settings() {
        let body = request_body("hi");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["safetySettings"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "[" }, { "text": "]" }] } }]
        }))
        .unwrap();
        assert_eq!(candidate_text(&response).as_deref(), Some("[]"));
    }

    #[test]
    fn test_blocked_response_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(candidate_text(&response).is_none());
    }
}
