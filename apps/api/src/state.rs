use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::industry::models::IndustryTable;
use crate::industry::risk::TransitionMap;
use crate::industry::TableCache;
use crate::llm_client::{ChatModel, LlmError};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Parsed reference tables, revalidated against the source on every access.
    pub tables: Arc<TableCache>,
    pub transitions: Arc<TransitionMap>,
    /// Absent when no API key is configured; LLM-backed endpoints then degrade.
    pub llm: Option<Arc<dyn ChatModel>>,
    pub sessions: SessionStore,
}

impl AppState {
    /// The current reference table. Load failures halt every core operation
    /// until a valid source is in place.
    pub fn table(&self) -> Result<Arc<IndustryTable>, AppError> {
        Ok(self.tables.load(&self.config.industry_data_path)?)
    }

    /// Drops the cached table and parses the source again.
    pub fn reload_table(&self) -> Result<Arc<IndustryTable>, AppError> {
        self.tables.invalidate(&self.config.industry_data_path);
        self.table()
    }

    pub fn llm(&self) -> Result<&dyn ChatModel, AppError> {
        self.llm
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured.into())
    }
}

#[cfg(test)]
impl AppState {
    /// State reading the reference table from `path`, with no model configured.
    pub fn for_table(path: &std::path::Path) -> Self {
        Self {
            config: Config {
                industry_data_path: path.to_path_buf(),
                transition_map_path: None,
                llm_api_key: None,
                llm_base_url: String::new(),
                llm_model: String::new(),
                port: 0,
                rust_log: "info".to_string(),
            },
            tables: Arc::new(TableCache::new()),
            transitions: Arc::new(TransitionMap::default()),
            llm: None,
            sessions: SessionStore::new(),
        }
    }
}
