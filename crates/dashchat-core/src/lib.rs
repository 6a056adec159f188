// dashchat core
//
// Pure pieces of the chat widget: no I/O, no async, no global state.
// The engine crate and the CLI both build on these.

pub mod dashscope;
pub mod format;
pub mod render;
pub mod theme;

pub use format::format_message;
pub use render::{render_message, Role};
pub use theme::Theme;
