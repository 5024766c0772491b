//! LLM-backed interview question generation.
//!
//! [`ChatCompletionGenerator`] talks to any OpenAI-compatible chat
//! completions endpoint (Qwen in production). The model returns one
//! question per line; the parser strips list markers and numbering.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single generated interview question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuestion {
    pub text: String,
    pub category: Option<String>,
}

/// Errors from question generation.
#[derive(Debug, Error)]
pub enum QuestionGeneratorError {
    #[error("question generation request failed: {0}")]
    Upstream(String),

    #[error("model returned no usable questions")]
    EmptyResponse,
}

/// Generates interview questions from a candidate's resume text.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        resume_text: &str,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, QuestionGeneratorError>;
}

/// `QuestionGenerator` backed by an OpenAI-compatible chat API.
pub struct ChatCompletionGenerator {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

const SYSTEM_PROMPT: &str = "You are an experienced technical interviewer. \
    Given a candidate's resume, write concrete interview questions grounded \
    in their stated experience. Output exactly one question per line with \
    no numbering and no commentary.";

impl ChatCompletionGenerator {
    /// Create a generator targeting `base_url` (e.g.
    /// `https://dashscope.example.com/compatible-mode/v1`).
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl QuestionGenerator for ChatCompletionGenerator {
    async fn generate(
        &self,
        resume_text: &str,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, QuestionGeneratorError> {
        let user_prompt = format!(
            "Write {count} interview questions for this candidate.\n\nResume:\n{resume_text}"
        );
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.7,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| QuestionGeneratorError::Upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuestionGeneratorError::Upstream(format!(
                "{url} returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| QuestionGeneratorError::Upstream(err.to_string()))?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        let questions = parse_questions(content, count);
        if questions.is_empty() {
            return Err(QuestionGeneratorError::EmptyResponse);
        }
        tracing::debug!(
            requested = count,
            produced = questions.len(),
            "Generated interview questions"
        );
        Ok(questions)
    }
}

/// Extract up to `count` questions from model output, one per line.
///
/// Tolerates the list formats models produce anyway: `1.`, `1)`, `-` and
/// `*` markers are stripped, blank lines skipped.
fn parse_questions(content: &str, count: usize) -> Vec<GeneratedQuestion> {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let marker = MARKER.get_or_init(|| {
        Regex::new(r"^\s*(?:\d+\s*[.)]\s*|[-*]\s+)").unwrap()
    });

    content
        .lines()
        .map(|line| marker.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(count)
        .map(|text| GeneratedQuestion {
            text,
            category: None,
        })
        .collect()
}

/// `QuestionGenerator` returning a fixed list; for tests.
#[derive(Default)]
pub struct CannedGenerator {
    questions: Vec<GeneratedQuestion>,
}

impl CannedGenerator {
    pub fn new(questions: Vec<GeneratedQuestion>) -> Self {
        Self { questions }
    }

    /// A generator producing `n` placeholder questions.
    pub fn with_placeholder_questions(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| GeneratedQuestion {
                    text: format!("Placeholder question {}", i + 1),
                    category: Some("general".to_string()),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl QuestionGenerator for CannedGenerator {
    async fn generate(
        &self,
        _resume_text: &str,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, QuestionGeneratorError> {
        if self.questions.is_empty() {
            return Err(QuestionGeneratorError::EmptyResponse);
        }
        Ok(self.questions.iter().take(count).cloned().collect())
    }
}
