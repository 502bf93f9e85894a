use std::path::PathBuf;
use thiserror::Error;

/// 中间件和主处理器抛出的错误类型
///
/// 任何实现了 `std::error::Error + Send + Sync` 的错误都可以通过 `?` 转换进来，
/// 错误解析器随后通过 `downcast_ref` 识别具体类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 框架错误类型
#[derive(Debug, Error)]
pub enum PrecognitionError {
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Unknown error parser: {0}")]
    UnknownErrorParser(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Request body is missing")]
    MissingBody,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to serialize response body: {0}")]
    Serialization(#[source] serde_json::Error),
}

pub type PrecognitionResult<T> = Result<T, PrecognitionError>;
