// dashchat Engine
// Everything with I/O: config loading, the DashScope client and the web chat
// bridge that serves the page and relays messages.

pub mod config;
pub mod http;
pub mod paths;
pub mod providers;
pub mod webchat;

/// Cut `text` to at most `max_chars` characters without splitting a char.
pub fn truncate_utf8(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
