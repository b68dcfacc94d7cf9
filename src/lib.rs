//! Landsat Metadata API - HTTP search interface for Landsat imagery metadata
//!
//! The API fronts an Elasticsearch index and exposes a single metadata
//! endpoint plus a health check:
//!
//! - `GET /landsat` - metadata search (`search`, `count`, `limit`, `skip`)
//! - `GET /healthcheck` - backend cluster health probe
//!
//! The interesting work happens before anything touches the network: client
//! parameters are validated into a canonical record ([`params`]), then
//! compiled into a backend search request ([`query`]) under a restricted
//! query-string grammar and the `openfda.`-namespace field rewrite. Both
//! steps are pure and synchronous; everything around them is thin I/O.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use landsat_api::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ApiConfig::load()?;
//!     landsat_api::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod params;
pub mod query;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use params::{ParamError, QueryParams, check_params};
pub use query::{
    Aggregation, QueryClause, QueryError, SearchRequest, build_query, replace_exact,
    supported_query_string,
};
pub use server::{router, start_server};
pub use state::AppState;
