/// LLM Client: the single point of entry for all chat-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the chat API directly.
/// Callers depend on the `ChatModel` trait; `LlmClient` is the HTTP backend
/// for any OpenAI-compatible `/chat/completions` endpoint (DeepSeek by default).
///
/// Each call is a single attempt. Failures surface as `LlmError` and are never
/// retried here; the deterministic engine output stays valid without the model.
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.6;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM API key is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

pub type ChunkStream = BoxStream<'static, Result<String, LlmError>>;

/// The text-completion collaborator. Implement this to swap backends
/// (or to fake the model in tests) without touching callers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Same as `complete`, yielding incremental text chunks.
    async fn complete_stream(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<ChunkStream, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn send(
        &self,
        system: &str,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, LlmError> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: ChatRole::System,
            content: system,
        });
        wire.extend(messages.iter().map(|m| WireMessage {
            role: m.role,
            content: &m.content,
        }));

        let request_body = ChatRequest {
            model: &self.model,
            messages: wire,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let response: ChatResponse = self.send(system, messages, false).await?.json().await?;

        if let Some(usage) = &response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn complete_stream(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<ChunkStream, LlmError> {
        let response = self.send(system, messages, true).await?;
        Ok(decode_event_stream(Box::pin(response.bytes_stream())))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SseLine {
    Delta(String),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> SseLine {
    let Some(payload) = line.trim().strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        return SseLine::Done;
    }
    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|text| !text.is_empty())
            .map(SseLine::Delta)
            .unwrap_or(SseLine::Skip),
        Err(e) => {
            warn!("Skipping malformed stream event: {e}");
            SseLine::Skip
        }
    }
}

struct EventStreamState<S> {
    bytes: S,
    buffer: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
}

impl<S> EventStreamState<S> {
    /// Moves every complete line out of the buffer. `flush` also takes a trailing partial line.
    fn drain_lines(&mut self, flush: bool) {
        loop {
            let line: Vec<u8> = match self.buffer.iter().position(|b| *b == b'\n') {
                Some(pos) => self.buffer.drain(..=pos).collect(),
                None if flush && !self.buffer.is_empty() => std::mem::take(&mut self.buffer),
                None => return,
            };
            match parse_sse_line(&String::from_utf8_lossy(&line)) {
                SseLine::Delta(text) => self.pending.push_back(text),
                SseLine::Done => {
                    self.done = true;
                    return;
                }
                SseLine::Skip => {}
            }
        }
    }
}

/// Turns a raw `text/event-stream` body into text deltas.
/// Events may be split across byte chunks.
fn decode_event_stream<S, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
    E: Into<LlmError> + Send + 'static,
{
    let state = EventStreamState {
        bytes,
        buffer: Vec::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(text) = state.pending.pop_front() {
                return Some((Ok(text), state));
            }
            if state.done {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.extend_from_slice(&chunk);
                    state.drain_lines(false);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    state.drain_lines(true);
                    state.done = true;
                }
            }
        }
    })
    .boxed()
}

/// Calls the model and deserializes its reply as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn complete_json<T: DeserializeOwned>(
    model: &dyn ChatModel,
    system: &str,
    prompt: &str,
) -> Result<T, LlmError> {
    let text = model.complete(system, &[ChatMessage::user(prompt)]).await?;
    serde_json::from_str(extract_json(&text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Fence-stripped text, narrowed to the outermost `{...}` when prose surrounds it.
fn extract_json(text: &str) -> &str {
    let text = strip_json_fences(text);
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// In-process `ChatModel` double used by tests across the crate.
#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    pub struct ScriptedModel {
        reply: Option<String>,
        calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    }

    impl ScriptedModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Every call fails with an API error.
        pub fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Content of the last message of each call, in call order.
        pub fn prompts(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|(_, messages)| messages.last().map(|m| m.content.clone()))
                .collect()
        }

        pub fn calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, system: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), messages.to_vec()));
            self.reply.clone().ok_or(LlmError::Api {
                status: 503,
                message: "scripted failure".to_string(),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            system: &str,
            messages: &[ChatMessage],
        ) -> Result<String, LlmError> {
            self.record(system, messages)
        }

        async fn complete_stream(
            &self,
            system: &str,
            messages: &[ChatMessage],
        ) -> Result<ChunkStream, LlmError> {
            let reply = self.record(system, messages)?;
            let chunks: Vec<Result<String, LlmError>> =
                reply.chars().map(|c| Ok(c.to_string())).collect();
            Ok(stream::iter(chunks).boxed())
        }
    }
}
