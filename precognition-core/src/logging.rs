use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, EnvFilter};

use crate::constants::{ENV_LOG_FORMAT, ENV_LOG_LEVEL};
use crate::error::{PrecognitionError, PrecognitionResult};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = PrecognitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(PrecognitionError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Level::from(*self).as_str().to_lowercase())
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 紧凑格式（默认）
    Compact,
    Full,
    /// JSON 格式，适合日志采集
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = PrecognitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "full" => Ok(LogFormat::Full),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(PrecognitionError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// 日志配置，对应配置文件中的 `[logging]` 段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub show_target: bool,
    /// 例如："precognition_core=debug,tower_http=info"
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            show_target: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// 用 `LOG_LEVEL`、`LOG_FORMAT` 覆盖配置，无法识别的值被忽略
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(level) = std::env::var(ENV_LOG_LEVEL).ok().and_then(|v| v.parse().ok()) {
            self.level = level;
        }
        if let Some(format) = std::env::var(ENV_LOG_FORMAT).ok().and_then(|v| v.parse().ok()) {
            self.format = format;
        }
        self
    }

    /// 初始化全局日志订阅者
    ///
    /// 过滤器优先级：`filter` 配置 > `RUST_LOG` > `level`
    pub fn init(&self) -> PrecognitionResult<()> {
        let env_filter = match &self.filter {
            Some(filter) => EnvFilter::try_new(filter)
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string())),
        };

        let builder = subscriber_fmt()
            .with_env_filter(env_filter)
            .with_target(self.show_target);

        let result = match self.format {
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Full => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        };

        result.map_err(|e| PrecognitionError::LoggingInit(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .level(LogLevel::Debug)
            .format(LogFormat::Json)
            .filter("precognition_core=trace");

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter.as_deref(), Some("precognition_core=trace"));
    }
}
