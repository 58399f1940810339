//! API 响应包裹：成功与失败共用同一结构。

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// 统一响应体；失败时不带 `data`。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEnvelope<T: Serialize> {
    pub(crate) ok: bool,
    pub(crate) code: String,
    pub(crate) message: String,
    pub(crate) suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<T>,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub(crate) fn success(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        data: T,
    ) -> Self {
        Self {
            ok: true,
            code: "OK".to_string(),
            message: message.into(),
            suggestion: suggestion.into(),
            data: Some(data),
        }
    }

    pub(crate) fn failure(code: &str, message: impl Into<String>, suggestion: &str) -> Self {
        Self {
            ok: false,
            code: code.to_string(),
            message: message.into(),
            suggestion: suggestion.to_string(),
            data: None,
        }
    }
}

/// 200 成功响应。
pub(crate) fn ok_response<T: Serialize>(
    message: impl Into<String>,
    suggestion: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiEnvelope<T>>) {
    (
        StatusCode::OK,
        Json(ApiEnvelope::success(message, suggestion, data)),
    )
}
