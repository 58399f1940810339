//! API 错误定义与响应转换。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::response::ApiEnvelope;

/// 接口错误。
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) code: &'static str,
    pub(crate) message: String,
    pub(crate) suggestion: &'static str,
}

impl ApiError {
    /// 构造统一 API 错误。
    pub(crate) fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        suggestion: &'static str,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            suggestion,
        }
    }

    /// access code 校验失败：所有原因共用同一个错误。
    pub(crate) fn access_code_invalid() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "ACCESS_CODE_INVALID",
            "Access code is not valid or has expired",
            "Request a new access code with your e-mail",
        )
    }

    /// 会话缺失或无效。
    pub(crate) fn session_invalid() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "SESSION_INVALID",
            "Please login first",
            "Open the link from your access code e-mail",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiEnvelope::<()>::failure(self.code, self.message, self.suggestion);
        (self.status, Json(body)).into_response()
    }
}
