pub mod clean;
pub mod gemini;
pub mod prompts;
pub mod worker;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::question::{Difficulty, Question};

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service is not configured")]
    Disabled,

    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(Box<reqwest::Error>),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("empty response from AI service")]
    EmptyResponse,

    #[error("could not read AI response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("AI returned no usable questions")]
    EmptyBatch,
}

#[cfg(feature = "network")]
impl From<reqwest::Error> for AiError {
    fn from(error: reqwest::Error) -> Self {
        AiError::Http(Box::new(error))
    }
}

/// One step of a worked solution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step: String,
    #[serde(default)]
    pub hint: String,
}

/// The generative backend. Every call is a single round trip without retry.
pub trait QuestionService: Send + Sync {
    fn generate_batch(
        &self,
        topic: &str,
        difficulty: Difficulty,
        math_mode: bool,
        count: usize,
    ) -> Result<Vec<Question>, AiError>;

    fn extract_topics(&self, text: &str) -> Result<Vec<String>, AiError>;

    fn term_definitions(&self, question_text: &str) -> Result<Option<String>, AiError>;

    fn explain_more(&self, question: &Question) -> Result<String, AiError>;

    fn step_breakdown(&self, question: &Question) -> Result<Vec<Step>, AiError>;

    fn verify_answer(&self, question: &Question) -> Result<String, AiError>;

    fn generate_diagram(&self, description: &str) -> Result<Option<String>, AiError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum AiRequest {
    Batch {
        topic: String,
        difficulty: Difficulty,
        math_mode: bool,
        count: usize,
    },
    Topics {
        text: String,
    },
    Definitions {
        question_text: String,
    },
    Explanation {
        question: Question,
    },
    Steps {
        question: Question,
    },
    Verify {
        question: Question,
    },
    Diagram {
        description: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum AiOutcome {
    Batch(Vec<Question>),
    Topics(Vec<String>),
    Definitions(Option<String>),
    Explanation(String),
    Steps(Vec<Step>),
    Verify(String),
    Diagram(Option<String>),
}

#[derive(Debug)]
pub struct AiReply {
    pub id: RequestId,
    pub result: Result<AiOutcome, AiError>,
}

/// Perform one request against `service`.
pub fn execute(service: &dyn QuestionService, request: &AiRequest) -> Result<AiOutcome, AiError> {
    match request {
        AiRequest::Batch {
            topic,
            difficulty,
            math_mode,
            count,
        } => service
            .generate_batch(topic, *difficulty, *math_mode, *count)
            .map(AiOutcome::Batch),
        AiRequest::Topics { text } => service.extract_topics(text).map(AiOutcome::Topics),
        AiRequest::Definitions { question_text } => service
            .term_definitions(question_text)
            .map(AiOutcome::Definitions),
        AiRequest::Explanation { question } => {
            service.explain_more(question).map(AiOutcome::Explanation)
        }
        AiRequest::Steps { question } => service.step_breakdown(question).map(AiOutcome::Steps),
        AiRequest::Verify { question } => service.verify_answer(question).map(AiOutcome::Verify),
        AiRequest::Diagram { description } => service
            .generate_diagram(description)
            .map(AiOutcome::Diagram),
    }
}
