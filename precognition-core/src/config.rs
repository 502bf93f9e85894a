//! 配置模块
//!
//! 从 TOML 加载协议配置，环境变量优先级高于配置文件：
//!
//! ```toml
//! error-parsers = ["validator", "field-errors"]
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::ENV_ERROR_PARSERS;
use crate::error::{PrecognitionError, PrecognitionResult};
use crate::logging::LoggingConfig;
use crate::parser::{ErrorParser, KnownErrorParser};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PrecognitionConfig {
    /// 内置错误解析器，按顺序尝试
    pub error_parsers: Vec<KnownErrorParser>,
    pub logging: LoggingConfig,
}

impl Default for PrecognitionConfig {
    fn default() -> Self {
        Self {
            error_parsers: vec![KnownErrorParser::Validator, KnownErrorParser::FieldErrors],
            logging: LoggingConfig::default(),
        }
    }
}

impl PrecognitionConfig {
    pub fn from_file(path: impl AsRef<Path>) -> PrecognitionResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PrecognitionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> PrecognitionResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 加载配置：文件存在时读取文件，否则使用默认值，最后应用环境变量
    pub fn load(path: impl AsRef<Path>) -> PrecognitionResult<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            tracing::debug!(path = %path.display(), "Loading precognition config");
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };
        config.with_env_overrides()
    }

    /// `PRECOGNITION_ERROR_PARSERS` 覆盖解析器列表，`LOG_LEVEL`/`LOG_FORMAT` 覆盖日志配置
    pub fn with_env_overrides(mut self) -> PrecognitionResult<Self> {
        if let Ok(parsers) = std::env::var(ENV_ERROR_PARSERS) {
            self.error_parsers = parse_parser_list(&parsers)?;
        }
        self.logging = self.logging.with_env_overrides();
        Ok(self)
    }

    pub fn error_parsers(&self) -> Vec<ErrorParser> {
        self.error_parsers
            .iter()
            .copied()
            .map(ErrorParser::Known)
            .collect()
    }
}

/// 解析逗号分隔的解析器标识，空项被忽略
pub fn parse_parser_list(value: &str) -> PrecognitionResult<Vec<KnownErrorParser>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<KnownErrorParser>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};

    #[test]
    fn test_defaults() {
        let config = PrecognitionConfig::parse_toml("").unwrap();
        assert_eq!(config, PrecognitionConfig::default());
        assert_eq!(config.error_parsers().len(), 2);
    }

    #[test]
    fn test_parse_toml() {
        let config = PrecognitionConfig::parse_toml(
            r#"
            error-parsers = ["field-errors"]

            [logging]
            level = "debug"
            format = "json"
            show-target = true
            "#,
        )
        .unwrap();

        assert_eq!(config.error_parsers, vec![KnownErrorParser::FieldErrors]);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.show_target);
    }

    #[test]
    fn test_unknown_parser_is_rejected() {
        let result = PrecognitionConfig::parse_toml(r#"error-parsers = ["zod"]"#);
        assert!(matches!(result, Err(PrecognitionError::ConfigParse(_))));
    }

    #[test]
    fn test_parse_parser_list() {
        assert_eq!(
            parse_parser_list("validator, FIELD_ERRORS_PARSER,").unwrap(),
            vec![KnownErrorParser::Validator, KnownErrorParser::FieldErrors]
        );
        assert!(parse_parser_list("").unwrap().is_empty());
        assert!(matches!(
            parse_parser_list("validator,joi"),
            Err(PrecognitionError::UnknownErrorParser(name)) if name == "joi"
        ));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = PrecognitionConfig::from_file("/nonexistent/precognition.toml");
        assert!(matches!(result, Err(PrecognitionError::ConfigRead { .. })));
    }
}
