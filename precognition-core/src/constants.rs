//! 协议常量定义
//!
//! 定义 Precognition 协议使用的请求头、响应头和默认值

// ==================== 请求头 ====================

/// 标记预知请求的请求头，值必须精确为 `"true"`
pub const PRECOGNITIVE_HEADER: &str = "Precognitive";

/// 客户端声明只关心的字段列表（逗号分隔），响应中也会回显
pub const VALIDATE_ONLY_HEADER: &str = "Precognition-Validate-Only";

// ==================== 响应头 ====================

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// 所有预知响应都携带的标记头
pub const PRECOGNITION_HEADER: &str = "Precognition";

/// 验证通过时携带的标记头
pub const PRECOGNITION_SUCCESS_HEADER: &str = "Precognition-Success";

// ==================== 取值 ====================

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const TRUE_VALUE: &str = "true";

/// `Precognition-Validate-Only` 字段列表分隔符
pub const FIELD_SEPARATOR: char = ',';

/// 内置错误解析器使用的通用错误消息
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error";

// ==================== 配置 ====================

/// 覆盖错误解析器列表的环境变量（逗号分隔）
pub const ENV_ERROR_PARSERS: &str = "PRECOGNITION_ERROR_PARSERS";

pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
