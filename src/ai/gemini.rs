use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::clean::{extract_svg, strip_code_fences};
use crate::ai::prompts;
use crate::ai::{AiError, QuestionService, Step};
use crate::config::Config;
use crate::session::question::{Difficulty, Question};

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub reasoning_model: String,
    pub fast_model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// `None` when no API key is available, which disables the client.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.api_key()?;
        Some(Self {
            base_url: config.api_base_url.clone(),
            api_key,
            reasoning_model: config.reasoning_model.clone(),
            fast_model: config.fast_model.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

impl GenerationConfig {
    fn json(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            ..Self::default()
        }
    }

    fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
    config: Option<GeminiConfig>,
}

impl GeminiClient {
    #[cfg(feature = "network")]
    pub fn new(config: Option<GeminiConfig>) -> Result<Self, AiError> {
        let timeout = config
            .as_ref()
            .map(|c| c.timeout)
            .unwrap_or(Duration::from_secs(90));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client, config })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(config: Option<GeminiConfig>) -> Result<Self, AiError> {
        Ok(Self { config })
    }

    pub fn enabled(&self) -> bool {
        cfg!(feature = "network") && self.config.is_some()
    }

    fn reasoning_model(&self) -> Result<&str, AiError> {
        self.config
            .as_ref()
            .map(|c| c.reasoning_model.as_str())
            .ok_or(AiError::Disabled)
    }

    fn fast_model(&self) -> Result<&str, AiError> {
        self.config
            .as_ref()
            .map(|c| c.fast_model.as_str())
            .ok_or(AiError::Disabled)
    }

    #[cfg(feature = "network")]
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        generation_config: GenerationConfig,
    ) -> Result<String, AiError> {
        let config = self.config.as_ref().ok_or(AiError::Disabled)?;
        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            model
        );
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        };

        tracing::debug!(model, "sending generateContent request");
        let response = self
            .client
            .post(url)
            .query(&[("key", config.api_key.as_str())])
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response.json()?;
        body.text().ok_or(AiError::EmptyResponse)
    }

    #[cfg(not(feature = "network"))]
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _generation_config: GenerationConfig,
    ) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }
}

impl QuestionService for GeminiClient {
    fn generate_batch(
        &self,
        topic: &str,
        difficulty: Difficulty,
        math_mode: bool,
        count: usize,
    ) -> Result<Vec<Question>, AiError> {
        let prompt = prompts::batch_prompt(topic, difficulty, math_mode, count);
        let text = self.generate(
            self.reasoning_model()?,
            &prompt,
            GenerationConfig::json(prompts::batch_schema()).with_temperature(0.7),
        )?;
        parse_batch(&text, topic, difficulty, count)
    }

    fn extract_topics(&self, text: &str) -> Result<Vec<String>, AiError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let reply = self.generate(
            self.fast_model()?,
            &prompts::extract_prompt(text),
            GenerationConfig::json(prompts::topics_schema()),
        )?;
        parse_topics(&reply)
    }

    fn term_definitions(&self, question_text: &str) -> Result<Option<String>, AiError> {
        let reply = self.generate(
            self.fast_model()?,
            &prompts::definitions_prompt(question_text),
            GenerationConfig::default().with_temperature(0.1),
        )?;
        Ok(parse_definitions(&reply))
    }

    fn explain_more(&self, question: &Question) -> Result<String, AiError> {
        self.generate(
            self.reasoning_model()?,
            &prompts::explain_prompt(question),
            GenerationConfig::default(),
        )
    }

    fn step_breakdown(&self, question: &Question) -> Result<Vec<Step>, AiError> {
        let reply = self.generate(
            self.reasoning_model()?,
            &prompts::steps_prompt(question),
            GenerationConfig::json(prompts::steps_schema()),
        )?;
        parse_steps(&reply)
    }

    fn verify_answer(&self, question: &Question) -> Result<String, AiError> {
        self.generate(
            self.reasoning_model()?,
            &prompts::verify_prompt(question),
            GenerationConfig::default(),
        )
    }

    fn generate_diagram(&self, description: &str) -> Result<Option<String>, AiError> {
        let reply = self.generate(
            self.fast_model()?,
            &prompts::diagram_prompt(description),
            GenerationConfig::default(),
        )?;
        Ok(extract_svg(&reply))
    }
}

/// Loosely typed question as it comes back from the model.
#[derive(Deserialize)]
struct RawQuestion {
    topic: Option<String>,
    question: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Option<String>,
    difficulty: Option<String>,
    #[serde(default)]
    explanation: String,
}

impl RawQuestion {
    fn into_question(self, topic: &str, difficulty: Difficulty) -> Option<Question> {
        let difficulty = match self.difficulty.as_deref().map(str::to_lowercase).as_deref() {
            Some("easy") => Difficulty::Easy,
            Some("medium") => Difficulty::Medium,
            Some("hard") => Difficulty::Hard,
            _ => difficulty,
        };
        let question = Question {
            topic: self
                .topic
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| topic.to_string()),
            question: self.question?,
            options: self.options,
            correct_answer: self.correct_answer?.trim().to_string(),
            difficulty,
            explanation: self.explanation,
        };
        question.is_well_formed().then_some(question)
    }
}

/// Parse a batch reply, dropping malformed questions.
pub fn parse_batch(
    text: &str,
    topic: &str,
    difficulty: Difficulty,
    count: usize,
) -> Result<Vec<Question>, AiError> {
    let raw: Vec<RawQuestion> = serde_json::from_str(&strip_code_fences(text))?;
    let received = raw.len();
    let questions: Vec<Question> = raw
        .into_iter()
        .filter_map(|q| q.into_question(topic, difficulty))
        .take(count)
        .collect();
    if questions.len() < received {
        tracing::warn!(
            received,
            kept = questions.len(),
            "dropped malformed or surplus generated questions"
        );
    }
    if questions.is_empty() {
        return Err(AiError::EmptyBatch);
    }
    Ok(questions)
}

pub fn parse_topics(text: &str) -> Result<Vec<String>, AiError> {
    let topics: Vec<String> = serde_json::from_str(&strip_code_fences(text))?;
    Ok(topics
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// `None` when the model reports there is nothing to define.
pub fn parse_definitions(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || text == "NULL" || text.to_lowercase().contains("geen") {
        return None;
    }
    Some(text.to_string())
}

pub fn parse_steps(text: &str) -> Result<Vec<Step>, AiError> {
    let steps: Vec<Step> = serde_json::from_str(&strip_code_fences(text))?;
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = r#"```json
[
  {"topic": "Cijferreeksen", "question": "2, 4, 8, ...", "options": ["A) 10", "B) 16"], "correct_answer": "B", "difficulty": "Easy", "explanation": "x2"},
  {"topic": "Cijferreeksen", "question": "1, 1, 2, ...", "options": [], "correct_answer": "A", "difficulty": "Easy", "explanation": ""},
  {"topic": "Cijferreeksen", "question": "3, 6, 9, ...", "options": ["A) 12", "B) 13"], "correct_answer": "E", "difficulty": "Easy", "explanation": ""},
  {"question": "5, 10, 20, ...", "options": ["A) 40", "B) 30"], "correct_answer": "A", "difficulty": "extreme", "explanation": "x2"}
]
```"#;

    #[test]
    fn test_parse_batch_drops_malformed() {
        let questions = parse_batch(BATCH, "Cijferreeksen", Difficulty::Medium, 10).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].difficulty, Difficulty::Easy);
        assert_eq!(questions[1].topic, "Cijferreeksen");
        assert_eq!(questions[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_parse_batch_respects_count() {
        let questions = parse_batch(BATCH, "Cijferreeksen", Difficulty::Medium, 1).unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn test_parse_batch_all_invalid_is_empty_batch() {
        let text = r#"[{"question": "?", "options": [], "correct_answer": "A"}]"#;
        assert!(matches!(
            parse_batch(text, "Analogieën", Difficulty::Easy, 10),
            Err(AiError::EmptyBatch)
        ));
        assert!(matches!(
            parse_batch("[]", "Analogieën", Difficulty::Easy, 10),
            Err(AiError::EmptyBatch)
        ));
    }

    #[test]
    fn test_parse_batch_garbage_is_json_error() {
        assert!(matches!(
            parse_batch("Sorry, I cannot help.", "Analogieën", Difficulty::Easy, 10),
            Err(AiError::Json(_))
        ));
    }

    #[test]
    fn test_parse_definitions() {
        assert_eq!(parse_definitions("NULL"), None);
        assert_eq!(parse_definitions("Er zijn geen moeilijke termen."), None);
        assert_eq!(
            parse_definitions(" Knoop: zeemijl per uur. ").as_deref(),
            Some("Knoop: zeemijl per uur.")
        );
    }

    #[test]
    fn test_parse_topics_and_steps() {
        let topics = parse_topics("```json\n[\"Meteorologie\", \" \", \"Navigatie\"]\n```").unwrap();
        assert_eq!(topics, vec!["Meteorologie", "Navigatie"]);

        let steps = parse_steps(r#"[{"step": "Reken per uur"}, {"step": "Deel", "hint": "x/3"}]"#)
            .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].hint, "");
    }

    #[test]
    fn test_response_text_extraction() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hallo"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("hallo"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(empty.text().is_none());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig::json(prompts::topics_schema())
                .with_temperature(0.1),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_client_without_key_is_disabled() {
        let client = GeminiClient::new(None).unwrap();
        assert!(!client.enabled());
        let q = crate::session::question::sample_question("Analogieën", Difficulty::Easy, "B");
        assert!(matches!(client.explain_more(&q), Err(AiError::Disabled)));
    }
}
