// dashchat Atoms: Chat Provider trait
// Every text-generation backend implements ChatProvider. The web chat and
// the CLI only ever hold `Arc<dyn ChatProvider>`.

use async_trait::async_trait;

// ── Error type ─────────────────────────────────────────────────────────────

/// Canonical error type for provider operations.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// HTTP / network failure before a response arrived; may be retried.
    Transport(String),
    /// Missing or rejected credentials; never retried.
    Auth(String),
    /// Non-2xx response. `code`/`message` come from a JSON error body when
    /// the provider sent one.
    Http {
        status: u16,
        reason: String,
        code: Option<String>,
        message: Option<String>,
        retry_after_secs: Option<u64>,
    },
    /// 2xx response that carried an API error code instead of output.
    Api { code: String, message: String },
    /// Choices were present but the first is not a usable assistant message.
    Malformed,
    /// Neither output nor error code in the body.
    UnknownFormat,
    /// 2xx body that is not decodable JSON.
    Decode(String),
    /// Circuit breaker is open; the request was not sent.
    CircuitOpen(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Transport(s) => write!(f, "transport error: {}", s),
            ProviderError::Auth(s) => write!(f, "auth error: {}", s),
            ProviderError::Http { status, reason, code, message, .. } => {
                write!(f, "HTTP {}: {}", status, reason)?;
                match (code.as_deref(), message.as_deref()) {
                    (Some(code), Some(message)) => write!(f, " ({}: {})", code, message),
                    (_, Some(message)) => write!(f, " ({})", message),
                    _ => Ok(()),
                }
            }
            ProviderError::Api { code, message } => write!(f, "API error: {} - {}", code, message),
            ProviderError::Malformed => f.write_str("response format is invalid"),
            ProviderError::UnknownFormat => f.write_str("unknown response format"),
            ProviderError::Decode(s) => write!(f, "invalid response body: {}", s),
            ProviderError::CircuitOpen(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Whether a fresh attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Transport(_) => true,
            ProviderError::Http { status, .. } => crate::engine::http::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Text shown to the person chatting. Rendered as plain text, never
    /// through the formatter.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Api { .. } => self.to_string(),
            ProviderError::Malformed | ProviderError::UnknownFormat => format!("Error: {}", self),
            _ => format!("Request failed: {}", self),
        }
    }
}

impl From<ProviderError> for String {
    fn from(e: ProviderError) -> Self {
        e.to_string()
    }
}

// ── The trait ──────────────────────────────────────────────────────────────

/// A backend that turns one user message into one assistant reply.
/// Single turn: implementations keep no conversation history.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name for logging and `/health`.
    fn name(&self) -> &str;

    /// Send the user's literal text and return the assistant's raw text.
    async fn generate(&self, user_text: &str) -> Result<String, ProviderError>;
}
