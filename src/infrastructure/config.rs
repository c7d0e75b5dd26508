//! 服务配置
//!
//! 加载顺序：`.env` 写入进程环境 → 默认值 → `PRODUCT_API_CONFIG` 指向的 TOML 文件
//! → 环境变量覆盖 (`PORT`、`API_KEY`、`LOG_LEVEL`)。已设置的环境变量优先于 `.env`。

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "PRODUCT_API_CONFIG";

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("解析 TOML 失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("解析 .env 失败: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("环境变量 {name} 无效: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("配置校验失败: {0}")]
    Validation(String),
}

/// 服务整体配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// API key 配置
    pub auth: AuthConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// API key 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 携带共享密钥的请求头
    pub header: String,
    pub api_key: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            timeout_seconds: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: "x-api-key".to_string(),
            api_key: "mysecretkey123".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 从环境加载配置
    pub fn load() -> Result<Self, ConfigError> {
        // 没有 .env 文件不算错误
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::DotEnv(e));
            }
        }

        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺失字段使用默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 应用环境变量覆盖；`lookup` 便于测试注入
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.http.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(key) = lookup("API_KEY") {
            self.auth.api_key = key;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("http.port 不能为 0".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_seconds 必须大于 0".to_string(),
            ));
        }
        if self.auth.api_key.is_empty() {
            return Err(ConfigError::Validation("auth.api_key 不能为空".to_string()));
        }
        if HeaderName::from_bytes(self.auth.header.as_bytes()).is_err() {
            return Err(ConfigError::Validation(format!(
                "auth.header 不是合法的请求头名称: {:?}",
                self.auth.header
            )));
        }
        Ok(())
    }

    /// 监听地址，如 `0.0.0.0:3000`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.auth.header, "x-api-key");
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [http]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.auth.api_key, "mysecretkey123");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auth]\napi_key = \"from-file\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.auth.api_key, "from-file");
        assert_eq!(config.auth.header, "x-api-key");
    }

    #[test]
    fn test_bad_toml_is_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("[http\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            [("PORT", "4000"), ("API_KEY", "s3cret"), ("LOG_LEVEL", "debug")]
                .into_iter()
                .collect();
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.http.port, 4000);
        assert_eq!(config.auth.api_key, "s3cret");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_dotenv_port_reaches_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PORT=5050\nAPI_KEY=from-dotenv\n").unwrap();

        // 读取到独立的 map，避免修改测试进程的环境变量
        let vars: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(|item| item.unwrap())
            .collect();
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|name| vars.get(name).cloned())
            .unwrap();

        assert_eq!(config.http.port, 5050);
        assert_eq!(config.auth.api_key, "from-dotenv");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_dotenv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PORT='5050\n").unwrap();

        let result: Result<Vec<(String, String)>, dotenvy::Error> =
            dotenvy::from_path_iter(&path).unwrap().collect();
        let err = result.unwrap_err();
        assert!(!err.not_found());
        assert!(matches!(ConfigError::from(err), ConfigError::DotEnv(_)));
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(|name| (name == "PORT").then(|| "abc".to_string()));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.http.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.header = "bad header".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.api_key.clear();
        assert!(config.validate().is_err());
    }
}
