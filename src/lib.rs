pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod source;
pub mod upstream;

pub use config::AppConfig;
pub use error::{ConfigError, LoadError, ProxyError};
pub use service::ProcurementQueries;
pub use source::{RecordLoader, RecordSource};
pub use upstream::ExtractionClient;
