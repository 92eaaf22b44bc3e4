//! PriceGrid search client: HTTP contract and background request engine.
mod client;
mod config;
mod engine;
mod types;

pub use client::{ReqwestSearchClient, SearchClient};
pub use config::{ConfigError, SearchConfig, SearchOptions, DEFAULT_ENDPOINT, DEFAULT_MAX_RESULTS};
pub use engine::EngineHandle;
pub use types::{EngineError, EngineEvent, FailureKind, RequestTag, SearchError};
