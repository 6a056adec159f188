// dashchat core: DashScope wire types
//
// Request/response bodies for the DashScope native text-generation API
// (result_format = "message") and the rules that turn a decoded response
// into either the assistant's reply or a failure kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Defaults ───────────────────────────────────────────────────────────

pub const DEFAULT_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";
pub const DEFAULT_MODEL: &str = "qwen-plus";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const RESULT_FORMAT_MESSAGE: &str = "message";
const ROLE_SYSTEM: &str = "system";
const ROLE_USER: &str = "user";
const ROLE_ASSISTANT: &str = "assistant";

// ── Request ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationInput {
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationParameters {
    pub result_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub input: GenerationInput,
    pub parameters: GenerationParameters,
}

impl GenerationRequest {
    /// One system message plus the user's literal text. No history is kept
    /// between requests.
    pub fn single_turn(model: &str, system_prompt: &str, user_text: &str) -> Self {
        GenerationRequest {
            model: model.to_string(),
            input: GenerationInput {
                messages: vec![
                    WireMessage { role: ROLE_SYSTEM.into(), content: system_prompt.to_string() },
                    WireMessage { role: ROLE_USER.into(), content: user_text.to_string() },
                ],
            },
            parameters: GenerationParameters { result_format: RESULT_FORMAT_MESSAGE.into() },
        }
    }
}

// ── Response ───────────────────────────────────────────────────────────

/// Lenient view of a response body. Both success and error payloads decode
/// into this; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub output: Option<GenerationOutput>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationOutput {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// `content` is kept as raw JSON: only a non-empty string counts as a reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// What a successfully decoded 2xx body means for the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Assistant text, ready for the formatter.
    Reply(String),
    /// Choices were present but the first one is not a usable assistant message.
    Malformed,
    /// The body carried an API error code instead of output.
    ApiError { code: String, message: String },
    /// Neither choices nor an error code.
    Unknown,
}

impl GenerationResponse {
    /// Interpret the body: choices first, then error code, then unknown.
    pub fn into_outcome(self) -> ReplyOutcome {
        let choices = self.output.and_then(|o| o.choices).unwrap_or_default();
        if let Some(first) = choices.into_iter().next() {
            return match first.message {
                Some(ChoiceMessage { role: Some(role), content: Some(Value::String(text)) })
                    if role == ROLE_ASSISTANT && !text.is_empty() =>
                {
                    ReplyOutcome::Reply(text)
                }
                _ => ReplyOutcome::Malformed,
            };
        }
        match self.code {
            Some(code) if !code.is_empty() => ReplyOutcome::ApiError {
                code,
                message: self.message.unwrap_or_default(),
            },
            _ => ReplyOutcome::Unknown,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
