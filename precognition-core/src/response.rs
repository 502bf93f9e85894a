//! 响应构建
//!
//! 所有预知响应都通过 [`create_response`] 构建，构建后不再修改

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE};

/// 传输层无关的响应对象
///
/// 序列化后的形状与 `{statusCode, headers, body}` 网关响应一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    status_code: u16,
    headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// 序列化后的 JSON 响应体
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// 将响应体解析回 JSON 值
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }

    /// 拆分为 (状态码, 响应头, 响应体)，供传输层适配器使用
    pub fn into_parts(self) -> (u16, BTreeMap<String, String>, Option<String>) {
        (self.status_code, self.headers, self.body)
    }
}

/// 构建响应
///
/// 总是带上 `Content-Type: application/json`，调用方传入的同名头会覆盖它。
/// `body` 为 `None` 时响应没有响应体
pub fn create_response<'a, I>(status_code: u16, body: Option<&Value>, headers: I) -> Response
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut all_headers = BTreeMap::new();
    all_headers.insert(CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string());
    for (name, value) in headers {
        all_headers.insert(name.to_string(), value.to_string());
    }

    Response {
        status_code,
        headers: all_headers,
        body: body.map(Value::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_response_with_body() {
        let response = create_response(200, Some(&json!({ "message": "ok" })), [("X-Test", "test")]);

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("X-Test"), Some("test"));
        assert_eq!(response.body(), Some(r#"{"message":"ok"}"#));
    }

    #[test]
    fn test_create_response_without_body() {
        let response = create_response(200, None, [("X-Test", "test")]);

        assert_eq!(response.headers().len(), 2);
        assert_eq!(response.body(), None);
        assert_eq!(response.json_body(), None);
    }

    #[test]
    fn test_caller_headers_override_content_type() {
        let response = create_response(200, None, [("Content-Type", "text/plain")]);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_serialized_shape() {
        let response = create_response(204, None, []);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "statusCode": 204,
                "headers": { "Content-Type": "application/json" }
            })
        );
    }
}
