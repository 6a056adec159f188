// dashchat core: Message Renderer
//
// Wraps one chat message in the bubble markup the chat page expects.
// User text is inserted verbatim; bot text goes through the formatter.

use crate::format::format_message;
use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// CSS modifier class on the bubble (`message user` / `message bot`).
    pub fn css_class(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    pub fn avatar_src(self) -> &'static str {
        match self {
            Role::User => "/avatar/user.svg",
            Role::Bot => "/avatar/bot.svg",
        }
    }

    pub fn avatar_alt(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Bot => "Bot",
        }
    }
}

/// Render a full message bubble.
///
/// The user's text is trusted and passed through unescaped, matching how the
/// page has always inserted it. Bot text is run through [`format_message`].
pub fn render_message(role: Role, text: &str) -> String {
    let content = match role {
        Role::User => text.to_string(),
        Role::Bot => format_message(text),
    };
    format!(
        r#"<div class="message {class}"><img src="{src}" alt="{alt}"><div class="message-content">{content}</div></div>"#,
        class = role.css_class(),
        src = role.avatar_src(),
        alt = role.avatar_alt(),
    )
}
