// ── dashchat Atoms: Constants ──────────────────────────────────────────────
// Named constants shared by config, web chat and provider code.

// ── Web chat defaults ─────────────────────────────────────────────────────
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3939;
pub const DEFAULT_PAGE_TITLE: &str = "DashChat";

// ── Provider defaults ─────────────────────────────────────────────────────
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ── Environment overrides ─────────────────────────────────────────────────
/// Takes precedence over `provider.api_key` when set and non-empty.
pub const ENV_API_KEY: &str = "DASHSCOPE_API_KEY";
/// Full path to the config file, replacing the platform default.
pub const ENV_CONFIG_PATH: &str = "DASHCHAT_CONFIG";

// ── Logging ───────────────────────────────────────────────────────────────
/// User text is cut to this many characters in debug logs.
pub(crate) const LOG_PREVIEW_CHARS: usize = 80;
