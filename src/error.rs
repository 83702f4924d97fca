//! 错误类型
//!
//! - `LoadError`: CSV 数据源不可用或格式错误, 由查询层降级为空结果
//! - `ProxyError`: 外部提取/匹配后端调用失败, 以 `{ error, code, details }` 返回给调用方
//! - `ConfigError`: 启动时配置加载失败

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// 数据源加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {origin}: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("load task aborted: {0}")]
    Aborted(String),
}

impl LoadError {
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// 代理错误分类码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProxyErrorCode {
    ConnectionRefused,
    Timeout,
    UnknownError,
}

/// 外部后端调用错误 (不自动重试)
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Could not connect to invoice extraction service. Is it running?")]
    ConnectionRefused { details: String },

    #[error("Connection to invoice extraction service timed out")]
    Timeout { details: String },

    #[error("Failed to communicate with invoice extraction service")]
    Unknown { details: String },
}

/// 返回给前端的错误体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyErrorBody {
    pub error: String,
    pub code: ProxyErrorCode,
    pub details: String,
}

impl ProxyError {
    pub fn unknown(details: impl Into<String>) -> Self {
        Self::Unknown {
            details: details.into(),
        }
    }

    pub fn code(&self) -> ProxyErrorCode {
        match self {
            Self::ConnectionRefused { .. } => ProxyErrorCode::ConnectionRefused,
            Self::Timeout { .. } => ProxyErrorCode::Timeout,
            Self::Unknown { .. } => ProxyErrorCode::UnknownError,
        }
    }

    pub fn details(&self) -> &str {
        match self {
            Self::ConnectionRefused { details }
            | Self::Timeout { details }
            | Self::Unknown { details } => details,
        }
    }

    pub fn to_body(&self) -> ProxyErrorBody {
        ProxyErrorBody {
            error: self.to_string(),
            code: self.code(),
            details: self.details().to_string(),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        let details = e.to_string();
        // 超时优先: 连接阶段超时同时满足 is_connect
        if e.is_timeout() {
            Self::Timeout { details }
        } else if e.is_connect() {
            Self::ConnectionRefused { details }
        } else {
            Self::Unknown { details }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
