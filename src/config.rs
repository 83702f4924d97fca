use crate::error::ConfigError;
use crate::source::LoadOptions;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fixtures: FixturesConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// CSV 数据源目录与分隔符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    pub dir: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl FixturesConfig {
    /// 分隔符须为单个 ASCII 字符
    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(LoadOptions {
                delimiter: *byte,
                ..LoadOptions::default()
            }),
            _ => Err(ConfigError::Invalid(format!(
                "fixtures.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}

/// 外部提取/匹配后端
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub extract_timeout_secs: u64,
    pub match_timeout_secs: u64,
    pub list_timeout_secs: u64,
}

impl BackendConfig {
    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    pub fn match_timeout(&self) -> Duration {
        Duration::from_secs(self.match_timeout_secs)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            fixtures: FixturesConfig {
                dir: PathBuf::from("fixtures"),
                delimiter: default_delimiter(),
            },
            backend: BackendConfig {
                url: "http://localhost:8000".to_string(),
                extract_timeout_secs: 10,
                match_timeout_secs: 60,
                list_timeout_secs: 30,
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> config/default.toml -> 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/default")
    }

    /// 从指定配置文件加载 (文件可不存在)
    ///
    /// 嵌套变量使用 `APP__SERVER__PORT` 形式; 旧的扁平变量
    /// `SERVER_HOST` / `SERVER_PORT` / `FIXTURES_DIR` / `BACKEND_URL` 优先级最高。
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("fixtures.dir", defaults.fixtures.dir.to_string_lossy().into_owned())?
            .set_default("fixtures.delimiter", defaults.fixtures.delimiter)?
            .set_default("backend.url", defaults.backend.url)?
            .set_default("backend.extract_timeout_secs", defaults.backend.extract_timeout_secs as i64)?
            .set_default("backend.match_timeout_secs", defaults.backend.match_timeout_secs as i64)?
            .set_default("backend.list_timeout_secs", defaults.backend.list_timeout_secs as i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("fixtures.dir", std::env::var("FIXTURES_DIR").ok())?
            .set_override_option("fixtures.delimiter", std::env::var("FIXTURES_DELIMITER").ok())?
            .set_override_option("backend.url", std::env::var("BACKEND_URL").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.fixtures.load_options()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_timeouts() {
        let config = AppConfig::default();
        assert_eq!(config.backend.extract_timeout(), Duration::from_secs(10));
        assert_eq!(config.backend.match_timeout(), Duration::from_secs(60));
        assert_eq!(config.backend.list_timeout(), Duration::from_secs(30));
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn delimiter_becomes_load_option() {
        let mut fixtures = AppConfig::default().fixtures;
        assert_eq!(fixtures.load_options().unwrap().delimiter, b',');

        fixtures.delimiter = ";".to_string();
        assert_eq!(fixtures.load_options().unwrap().delimiter, b';');

        fixtures.delimiter = ";;".to_string();
        assert!(matches!(fixtures.load_options(), Err(ConfigError::Invalid(_))));
        fixtures.delimiter = String::new();
        assert!(fixtures.load_options().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.backend.match_timeout_secs, 60);
        assert!(!config.backend.url.is_empty());
    }
}
