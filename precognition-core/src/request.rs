//! 请求模型
//!
//! 协议只读取请求头，请求体留给中间件和主处理器解析

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::constants::{PRECOGNITIVE_HEADER, TRUE_VALUE, VALIDATE_ONLY_HEADER};
use crate::error::{PrecognitionError, PrecognitionResult};

/// 传入的请求
///
/// 请求头名称区分大小写，每个请求头只有一个字符串值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    headers: HashMap<String, String>,
    body: Option<String>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置请求头（同名覆盖）
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// 设置原始请求体
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 将可序列化对象编码为 JSON 请求体
    pub fn with_json<T: serde::Serialize>(self, body: &T) -> PrecognitionResult<Self> {
        let body = serde_json::to_string(body).map_err(PrecognitionError::Serialization)?;
        Ok(self.with_body(body))
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// 将请求体反序列化为 `T`
    pub fn json<T: DeserializeOwned>(&self) -> PrecognitionResult<T> {
        let body = self.body.as_deref().ok_or(PrecognitionError::MissingBody)?;
        serde_json::from_str(body).map_err(PrecognitionError::InvalidJson)
    }

    /// 是否为预知请求：`Precognitive` 头的值必须精确等于 `"true"`
    pub fn is_precognitive(&self) -> bool {
        self.header(PRECOGNITIVE_HEADER) == Some(TRUE_VALUE)
    }

    /// 非空的 `Precognition-Validate-Only` 原始值
    pub fn validate_only(&self) -> Option<&str> {
        self.header(VALIDATE_ONLY_HEADER).filter(|value| !value.is_empty())
    }
}

impl From<HashMap<String, String>> for Request {
    fn from(headers: HashMap<String, String>) -> Self {
        Self {
            headers,
            body: None,
        }
    }
}
