use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Elasticsearch host, with or without a scheme
    #[serde(default = "default_es_host")]
    pub es_host: String,

    /// Index to search; also the name of the metadata endpoint path
    #[serde(default = "default_index")]
    pub index: String,

    /// Timeout for backend search calls in seconds
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    /// Timeout for inbound requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log level / env-filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            es_host: default_es_host(),
            index: default_index(),
            search_timeout_secs: default_search_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            enable_cors: default_true(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from an optional `api.*` file overridden by
    /// `LANDSAT_API_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("api").required(false))
            .add_source(config::Environment::with_prefix("LANDSAT_API").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Backend base URL. A bare `host:port` gets an `http://` scheme.
    pub fn backend_url(&self) -> String {
        let host = self.es_host.trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }

    /// Get the backend search timeout as Duration
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Get the inbound request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_es_host() -> String {
    "localhost:9200".to_string()
}

fn default_index() -> String {
    "landsat".to_string()
}

fn default_search_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.es_host, "localhost:9200");
        assert_eq!(cfg.index, "landsat");
        assert_eq!(cfg.search_timeout_secs, 10);
        assert!(cfg.enable_cors);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ApiConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_backend_url_scheme_handling() {
        let mut cfg = ApiConfig::default();
        assert_eq!(cfg.backend_url(), "http://localhost:9200");

        cfg.es_host = "https://es.example.com:9243/".to_string();
        assert_eq!(cfg.backend_url(), "https://es.example.com:9243");
    }
}
