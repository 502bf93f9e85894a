//! 验证错误数据
//!
//! [`ValidationErrorsData`] 是错误解析器的统一输出，[`FieldErrors`] 是框架自带的
//! 字段错误类型，适合在中间件里手写校验逻辑时使用

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::VALIDATION_ERROR_MESSAGE;

/// 单个字段的错误消息：一条字符串或按顺序排列的多条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    Single(String),
    Many(Vec<String>),
}

impl FieldMessages {
    /// 代表性消息：字符串本身，或序列的第一条（空序列为空字符串）
    pub fn first(&self) -> &str {
        match self {
            Self::Single(message) => message,
            Self::Many(messages) => messages.first().map(String::as_str).unwrap_or(""),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Single(message) => Value::String(message.clone()),
            Self::Many(messages) => {
                Value::Array(messages.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<String> for FieldMessages {
    fn from(message: String) -> Self {
        Self::Single(message)
    }
}

impl From<&str> for FieldMessages {
    fn from(message: &str) -> Self {
        Self::Single(message.to_string())
    }
}

impl From<Vec<String>> for FieldMessages {
    fn from(messages: Vec<String>) -> Self {
        Self::Many(messages)
    }
}

/// 字段键 -> 错误消息
pub type ValidationErrors = HashMap<String, FieldMessages>;

/// 结构化的验证错误数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorsData {
    pub message: String,
    pub errors: ValidationErrors,
}

impl ValidationErrorsData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: HashMap::new(),
        }
    }

    pub fn with_error(mut self, field: impl Into<String>, messages: impl Into<FieldMessages>) -> Self {
        self.errors.insert(field.into(), messages.into());
        self
    }

    /// 响应体 `{message, errors}`
    pub fn to_json(&self) -> Value {
        let errors: Map<String, Value> = self
            .errors
            .iter()
            .map(|(field, messages)| (field.clone(), messages.to_json()))
            .collect();

        let mut body = Map::new();
        body.insert("message".to_string(), Value::String(self.message.clone()));
        body.insert("errors".to_string(), Value::Object(errors));
        Value::Object(body)
    }
}

/// 按上报顺序收集的字段错误
///
/// 由内置的 `FieldErrors` 解析器识别
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Field validation errors")]
pub struct FieldErrors {
    violations: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push((field.into(), message.into()));
    }

    /// 记录 `result` 中的错误，成功时什么也不做
    pub fn add_result(&mut self, result: Result<(), FieldErrors>) {
        if let Err(other) = result {
            self.violations.extend(other.violations);
        }
    }

    pub fn violations(&self) -> &[(String, String)] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// 没有错误时返回 `Ok(())`
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// 按字段分组，保留每个字段内的上报顺序
    pub fn to_data(&self) -> ValidationErrorsData {
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for (field, message) in &self.violations {
            grouped
                .entry(field.clone())
                .or_default()
                .push(message.clone());
        }

        ValidationErrorsData {
            message: VALIDATION_ERROR_MESSAGE.to_string(),
            errors: grouped
                .into_iter()
                .map(|(field, messages)| (field, FieldMessages::Many(messages)))
                .collect(),
        }
    }
}
