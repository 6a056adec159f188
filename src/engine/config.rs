// dashchat Engine: configuration
//
// One TOML file with a [server] and a [provider] table. Every key is
// optional; a missing file means all defaults. The API key may come from
// DASHSCOPE_API_KEY instead of the file.

use crate::atoms::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PAGE_TITLE, DEFAULT_PORT,
    DEFAULT_TIMEOUT_SECS, ENV_API_KEY,
};
use crate::atoms::error::{EngineError, EngineResult};
use crate::engine::http::DEFAULT_MAX_RETRIES;
use dashchat_core::dashscope::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use dashchat_core::Theme;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Web chat server ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind: "127.0.0.1" (local only) or "0.0.0.0" (LAN)
    pub bind_address: String,
    /// 0 picks a free port.
    pub port: u16,
    /// Title shown on the chat page
    pub page_title: String,
    /// Initial theme; the page remembers the visitor's own choice.
    pub theme: Theme,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: DEFAULT_BIND_ADDRESS.into(),
            port: DEFAULT_PORT,
            page_title: DEFAULT_PAGE_TITLE.into(),
            theme: Theme::default(),
        }
    }
}

// ── Text-generation provider ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub system_prompt: String,
    /// Bearer key. Prefer DASHSCOPE_API_KEY over storing it here.
    pub api_key: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            api_key: String::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

// ── Whole file ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Load from `path`. A missing file yields defaults; a malformed one is
    /// an error. Environment overrides are applied afterwards.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            info!("[config] Loaded {}", path.display());
            Self::from_toml_str(&text)?
        } else {
            info!("[config] No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_api_key_override(std::env::var(ENV_API_KEY).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// A non-empty override replaces the file's key.
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = key.trim().to_string();
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.provider.endpoint.trim().is_empty() {
            return Err(EngineError::Config("provider.endpoint must not be empty".into()));
        }
        if self.provider.model.trim().is_empty() {
            return Err(EngineError::Config("provider.model must not be empty".into()));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(EngineError::Config("server.bind_address must not be empty".into()));
        }
        if self.provider.api_key.is_empty() {
            warn!("[config] No API key set; requests will fail until {} is provided", ENV_API_KEY);
        }
        Ok(())
    }

    /// Copy with the API key masked, for printing.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.provider.api_key = mask_secret(&self.provider.api_key);
        copy
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    if secret.chars().count() <= 6 {
        return "****".into();
    }
    let visible: String = secret.chars().take(3).collect();
    format!("{visible}****")
}
