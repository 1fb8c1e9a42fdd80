use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{PipelineError, Result};

pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);
const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.4;

/// Chat-completion seam. The pipeline only ever needs "system + user in,
/// text out", which keeps the real client and the test double small.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// OpenAI chat-completions client. The key and model are fixed at
/// construction; nothing here reads the environment.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = Client::builder().timeout(COMPLETION_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    /// Single request, no retry. Transport and API errors propagate to the
    /// caller, which decides the run-level consequences.
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Completion {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(PipelineError::EmptyCompletion)?;
        debug!(chars = content.len(), "received completion");
        Ok(content)
    }
}

/// Scripted stand-in for tests: returns queued replies in order and records
/// every prompt pair it was given. An exhausted queue answers with an empty
/// string, which downstream code must tolerate anyway.
#[derive(Default)]
pub struct MockCompletionClient {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies
            .lock()
            .expect("poisoned replies")
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.replies
            .lock()
            .expect("poisoned replies")
            .push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("poisoned calls").clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .expect("poisoned calls")
            .push((system.to_string(), user.to_string()));
        match self.replies.lock().expect("poisoned replies").pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(PipelineError::Completion {
                status: 500,
                body: message,
            }),
            None => Ok(String::new()),
        }
    }
}
