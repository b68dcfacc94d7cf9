use std::sync::Arc;

use crate::backend::EsClient;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,

    /// Elasticsearch client (shared connection pool)
    pub backend: EsClient,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let backend = EsClient::new(&config)
            .map_err(|err| ApiError::Config(format!("backend client: {err}")))?;

        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }
}
