//! 错误解析器
//!
//! 把中间件抛出的错误转换为 [`ValidationErrorsData`]。解析器返回 `None` 表示
//! “不适用”，调度器会继续尝试下一个解析器
//!
//! ## 内置解析器
//!
//! - [`KnownErrorParser::Validator`] - 识别 `validator` 库的 `ValidationErrors`
//! - [`KnownErrorParser::FieldErrors`] - 识别框架自带的 [`FieldErrors`]
//!
//! 其他验证库通过 [`ErrorParser::custom`] 接入

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::VALIDATION_ERROR_MESSAGE;
use crate::error::PrecognitionError;
use crate::validation::{FieldErrors, FieldMessages, ValidationErrorsData};

/// 解析器接收的错误对象
pub type RaisedError = dyn std::error::Error + Send + Sync + 'static;

/// 解析后的统一函数类型
pub type ParseFn = Arc<dyn Fn(&RaisedError) -> Option<ValidationErrorsData> + Send + Sync>;

/// 内置解析器标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnownErrorParser {
    Validator,
    FieldErrors,
}

impl KnownErrorParser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::FieldErrors => "field-errors",
        }
    }
}

impl FromStr for KnownErrorParser {
    type Err = PrecognitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "validator" | "VALIDATOR_ERROR_PARSER" => Ok(Self::Validator),
            "field-errors" | "FIELD_ERRORS_PARSER" => Ok(Self::FieldErrors),
            other => Err(PrecognitionError::UnknownErrorParser(other.to_string())),
        }
    }
}

impl fmt::Display for KnownErrorParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 错误解析器：内置标识或调用方提供的函数
#[derive(Clone)]
pub enum ErrorParser {
    Known(KnownErrorParser),
    Custom(ParseFn),
}

impl ErrorParser {
    pub fn custom<F>(parser: F) -> Self
    where
        F: Fn(&RaisedError) -> Option<ValidationErrorsData> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(parser))
    }

    /// 解析为统一的函数类型，自定义函数原样返回
    pub fn resolve(&self) -> ParseFn {
        match self {
            Self::Known(KnownErrorParser::Validator) => Arc::new(validator_error_parser),
            Self::Known(KnownErrorParser::FieldErrors) => Arc::new(field_errors_parser),
            Self::Custom(parser) => Arc::clone(parser),
        }
    }
}

impl From<KnownErrorParser> for ErrorParser {
    fn from(parser: KnownErrorParser) -> Self {
        Self::Known(parser)
    }
}

impl FromStr for ErrorParser {
    type Err = PrecognitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<KnownErrorParser>().map(Self::Known)
    }
}

impl fmt::Debug for ErrorParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(parser) => f.debug_tuple("Known").field(parser).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// 解析 `parser` 得到可调用的解析函数
pub fn resolve_error_parser(parser: &ErrorParser) -> ParseFn {
    parser.resolve()
}

fn validator_error_parser(error: &RaisedError) -> Option<ValidationErrorsData> {
    let errors = error.downcast_ref::<validator::ValidationErrors>()?;

    let mut violations = Vec::new();
    collect_violations("", errors, &mut violations);
    Some(group_violations(violations))
}

fn field_errors_parser(error: &RaisedError) -> Option<ValidationErrorsData> {
    error.downcast_ref::<FieldErrors>().map(FieldErrors::to_data)
}

/// 展开嵌套的结构体和列表错误，路径以 `.` 连接
fn collect_violations(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<(String, String)>,
) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, field);
        match kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push((path.clone(), message));
                }
            }
            validator::ValidationErrorsKind::Struct(nested) => {
                collect_violations(&path, nested, out);
            }
            validator::ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(&join_path(&path, &index.to_string()), nested, out);
                }
            }
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn group_violations(violations: Vec<(String, String)>) -> ValidationErrorsData {
    let mut data = ValidationErrorsData::new(VALIDATION_ERROR_MESSAGE);
    for (path, message) in violations {
        match data.errors.get_mut(&path) {
            Some(FieldMessages::Many(messages)) => messages.push(message),
            _ => {
                data.errors.insert(path, FieldMessages::Many(vec![message]));
            }
        }
    }
    data
}
