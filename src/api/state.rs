use std::sync::Arc;

use crate::{
    config::Config,
    db::Cache,
    services::{GeminiClient, LlmClient, MetadataProvider, OmdbProvider},
    session::SessionStore,
};

/// Non-secret settings needed to build service clients from a user's own keys
#[derive(Clone)]
pub struct ServiceSettings {
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub omdb_api_url: String,
    pub metadata_cache: Option<Cache>,
    pub metadata_cache_ttl: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            gemini_api_url: crate::config::default_gemini_api_url(),
            gemini_model: crate::config::default_gemini_model(),
            omdb_api_url: crate::config::default_omdb_api_url(),
            metadata_cache: None,
            metadata_cache_ttl: crate::config::default_metadata_cache_ttl(),
        }
    }
}

impl ServiceSettings {
    pub fn from_config(config: &Config, metadata_cache: Option<Cache>) -> Self {
        Self {
            gemini_api_url: config.gemini_api_url.clone(),
            gemini_model: config.gemini_model.clone(),
            omdb_api_url: config.omdb_api_url.clone(),
            metadata_cache,
            metadata_cache_ttl: config.metadata_cache_ttl,
        }
    }

    pub fn gemini_client(&self, api_key: String) -> Arc<dyn LlmClient> {
        Arc::new(GeminiClient::new(
            api_key,
            self.gemini_api_url.clone(),
            self.gemini_model.clone(),
        ))
    }

    pub fn omdb_provider(&self, api_key: String) -> Arc<dyn MetadataProvider> {
        let provider = OmdbProvider::new(api_key, self.omdb_api_url.clone());
        match &self.metadata_cache {
            Some(cache) => Arc::new(provider.with_cache(cache.clone(), self.metadata_cache_ttl)),
            None => Arc::new(provider),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Default clients handed to every new session
    pub llm: Arc<dyn LlmClient>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub settings: Arc<ServiceSettings>,
}

impl AppState {
    /// Creates state around the given default clients
    pub fn new(llm: Arc<dyn LlmClient>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            sessions: SessionStore::new(),
            llm,
            metadata,
            settings: Arc::new(ServiceSettings::default()),
        }
    }

    /// Builds Gemini and OMDb clients from configuration
    pub fn from_config(config: &Config, metadata_cache: Option<Cache>) -> Self {
        let settings = ServiceSettings::from_config(config, metadata_cache);
        let llm = settings.gemini_client(config.gemini_api_key.clone());
        let metadata = settings.omdb_provider(config.omdb_api_key.clone());

        Self {
            sessions: SessionStore::new(),
            llm,
            metadata,
            settings: Arc::new(settings),
        }
    }
}
