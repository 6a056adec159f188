// dashchat: a chat page in front of a DashScope text-generation model.
//
// atoms   constants, error types, the ChatProvider trait
// engine  config, HTTP retry helpers, the DashScope provider, the web chat
//
// The pure formatting and wire types live in `dashchat-core` and are
// re-exported here.

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult};
pub use atoms::traits::{ChatProvider, ProviderError};
pub use dashchat_core::{dashscope, format_message, render_message, Role, Theme};
pub use engine::config::{AppConfig, ProviderConfig, ServerConfig};
pub use engine::webchat::{ChatStatus, Frame, WebChat, WebChatHandle};
