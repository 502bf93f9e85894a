//! 预知响应
//!
//! 把预知请求的三种结局（全部通过、全部失败、部分字段失败/通过）塑造成响应对象

use serde_json::{Map, Value};

use crate::constants::{
    FIELD_SEPARATOR, PRECOGNITION_HEADER, PRECOGNITION_SUCCESS_HEADER, TRUE_VALUE,
    VALIDATE_ONLY_HEADER,
};
use crate::request::Request;
use crate::response::{create_response, Response};
use crate::validation::{ValidationErrors, ValidationErrorsData};

/// 前置中间件全部通过：204，并回显 `Precognition-Validate-Only`
pub fn success_response(request: &Request) -> Response {
    let mut headers = vec![
        (PRECOGNITION_HEADER, TRUE_VALUE),
        (PRECOGNITION_SUCCESS_HEADER, TRUE_VALUE),
    ];
    if let Some(validate_only) = request.validate_only() {
        headers.push((VALIDATE_ONLY_HEADER, validate_only));
    }
    create_response(204, None, headers)
}

/// 无法识别的错误：500 `{message}`，不带 Precognition 头
pub fn error_response(message: &str) -> Response {
    let mut body = Map::new();
    body.insert("message".to_string(), Value::String(message.to_string()));
    create_response(500, Some(&Value::Object(body)), [])
}

/// 解析出验证错误后的响应
///
/// 请求带非空的 `Precognition-Validate-Only` 时只返回客户端关心的字段
pub fn validation_errors_response(data: &ValidationErrorsData, request: &Request) -> Response {
    match request.validate_only() {
        Some(validate_only) => {
            let keys: Vec<&str> = validate_only.split(FIELD_SEPARATOR).collect();
            partial_validation_errors_response(data, &keys)
        }
        None => create_response(422, Some(&data.to_json()), [(PRECOGNITION_HEADER, TRUE_VALUE)]),
    }
}

/// 按客户端声明的字段过滤错误
///
/// 每个键都会被访问以构建过滤后的错误表，但代表性消息只记录第一个非空的
pub fn partial_validation_errors_response(data: &ValidationErrorsData, keys: &[&str]) -> Response {
    let (errors, message) = keys.iter().fold(
        (ValidationErrors::new(), None::<&str>),
        |(mut errors, message), key| {
            let Some(messages) = data.errors.get(*key) else {
                return (errors, message);
            };
            // 空消息的字段仍保留在结果中，只是不能作为代表消息
            errors.insert(key.to_string(), messages.clone());
            let message = message.or_else(|| Some(messages.first()).filter(|m| !m.is_empty()));
            (errors, message)
        },
    );

    let Some(message) = message else {
        tracing::debug!(keys = ?keys, "No requested field has errors");
        return create_response(
            204,
            None,
            [
                (PRECOGNITION_HEADER, TRUE_VALUE),
                (PRECOGNITION_SUCCESS_HEADER, TRUE_VALUE),
            ],
        );
    };

    let filtered = ValidationErrorsData {
        message: message.to_string(),
        errors,
    };
    let validate_only = keys.join(",");
    create_response(
        422,
        Some(&filtered.to_json()),
        [
            (PRECOGNITION_HEADER, TRUE_VALUE),
            (VALIDATE_ONLY_HEADER, validate_only.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldMessages;
    use serde_json::json;

    fn full_errors() -> ValidationErrorsData {
        ValidationErrorsData::new("Validation error")
            .with_error("name", vec!["name too short".to_string()])
            .with_error("age", vec!["too young".to_string(), "must be even".to_string()])
            .with_error("email", "invalid email")
    }

    #[test]
    fn test_success_response() {
        let response = success_response(&Request::new());

        assert_eq!(response.status_code(), 204);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("Precognition"), Some("true"));
        assert_eq!(response.header("Precognition-Success"), Some("true"));
        assert_eq!(response.header("Precognition-Validate-Only"), None);
        assert_eq!(response.body(), None);
    }

    #[test]
    fn test_success_response_echoes_validate_only() {
        let request = Request::new().with_header("Precognition-Validate-Only", "name, age");
        let response = success_response(&request);

        assert_eq!(response.header("Precognition-Validate-Only"), Some("name, age"));
    }

    #[test]
    fn test_error_response() {
        let response = error_response("boom");

        assert_eq!(response.status_code(), 500);
        assert_eq!(response.json_body(), Some(json!({ "message": "boom" })));
        assert_eq!(response.header("Precognition"), None);
    }

    #[test]
    fn test_full_errors_without_filter() {
        let response = validation_errors_response(&full_errors(), &Request::new());

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.header("Precognition"), Some("true"));
        assert_eq!(response.header("Precognition-Validate-Only"), None);
        assert_eq!(response.json_body(), Some(full_errors().to_json()));
    }

    #[test]
    fn test_empty_filter_header_means_no_filtering() {
        let request = Request::new().with_header("Precognition-Validate-Only", "");
        let response = validation_errors_response(&full_errors(), &request);

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.json_body(), Some(full_errors().to_json()));
    }

    #[test]
    fn test_partial_filter_keeps_requested_keys() {
        let response = partial_validation_errors_response(&full_errors(), &["age", "missing", "name"]);

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.header("Precognition-Validate-Only"), Some("age,missing,name"));
        assert_eq!(response.header("Precognition-Success"), None);
        assert_eq!(
            response.json_body(),
            Some(json!({
                "message": "too young",
                "errors": {
                    "age": ["too young", "must be even"],
                    "name": ["name too short"]
                }
            }))
        );
    }

    #[test]
    fn test_partial_filter_single_string_message() {
        let response = partial_validation_errors_response(&full_errors(), &["email"]);

        assert_eq!(
            response.json_body(),
            Some(json!({ "message": "invalid email", "errors": { "email": "invalid email" } }))
        );
    }

    #[test]
    fn test_partial_filter_without_matches_is_success() {
        let response = partial_validation_errors_response(&full_errors(), &["address"]);

        assert_eq!(response.status_code(), 204);
        assert_eq!(response.header("Precognition"), Some("true"));
        assert_eq!(response.header("Precognition-Success"), Some("true"));
        assert_eq!(response.header("Precognition-Validate-Only"), None);
        assert_eq!(response.body(), None);
    }

    #[test]
    fn test_empty_message_keeps_scanning() {
        let data = ValidationErrorsData::new("Validation error")
            .with_error("name", FieldMessages::Many(vec![]))
            .with_error("nickname", "")
            .with_error("age", "too young");

        let response = partial_validation_errors_response(&data, &["name", "nickname", "age"]);

        assert_eq!(response.status_code(), 422);
        assert_eq!(
            response.json_body(),
            Some(json!({
                "message": "too young",
                "errors": { "name": [], "nickname": "", "age": "too young" }
            }))
        );
    }

    #[test]
    fn test_only_empty_messages_is_success() {
        let data = ValidationErrorsData::new("Validation error").with_error("name", FieldMessages::Many(vec![]));

        let response = partial_validation_errors_response(&data, &["name"]);
        assert_eq!(response.status_code(), 204);
    }

    #[test]
    fn test_duplicate_keys_are_echoed() {
        let response = partial_validation_errors_response(&full_errors(), &["name", "name"]);

        assert_eq!(response.header("Precognition-Validate-Only"), Some("name,name"));
        assert_eq!(
            response.json_body(),
            Some(json!({ "message": "name too short", "errors": { "name": ["name too short"] } }))
        );
    }

    #[test]
    fn test_filter_by_all_keys_matches_full_errors() {
        let data = full_errors();
        let mut keys: Vec<&str> = data.errors.keys().map(String::as_str).collect();
        keys.sort();

        let response = partial_validation_errors_response(&data, &keys);
        let body = response.json_body().unwrap();

        assert_eq!(body["errors"], full_errors().to_json()["errors"]);
    }
}
