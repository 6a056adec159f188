// dashchat Engine: provider registry
// Callers hold `Arc<dyn ChatProvider>` and never name the concrete backend.

pub mod dashscope;

pub use dashscope::DashScopeProvider;

use crate::atoms::error::EngineResult;
use crate::atoms::traits::ChatProvider;
use crate::engine::config::ProviderConfig;
use std::sync::Arc;

/// Build the configured provider. DashScope is the only backend today.
pub fn from_config(config: &ProviderConfig) -> EngineResult<Arc<dyn ChatProvider>> {
    Ok(Arc::new(DashScopeProvider::new(config)?))
}
