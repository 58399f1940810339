//! API 请求/响应类型。

use serde::{Deserialize, Serialize};

use crate::guests::GuestStatus;

/// 申请 access code 请求。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestCodeRequest {
    #[serde(default)]
    pub(crate) email: String,
}

/// 申请 access code 返回数据。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestCodeData {
    pub(crate) sent: bool,
}

/// access code 登录请求（JSON）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) access_code: String,
    #[serde(default)]
    pub(crate) next: Option<String>,
}

/// 登录链接 query 参数（邮件中的链接直接落到这里）。
#[derive(Debug, Deserialize)]
pub(crate) struct LoginQuery {
    #[serde(default)]
    pub(crate) access_code: String,
    #[serde(default)]
    pub(crate) next: Option<String>,
}

impl From<LoginQuery> for LoginRequest {
    fn from(query: LoginQuery) -> Self {
        Self {
            access_code: query.access_code,
            next: query.next,
        }
    }
}

/// 登录成功返回数据。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginData {
    pub(crate) guest_id: u64,
    pub(crate) display_name: String,
    pub(crate) language: String,
    pub(crate) redirect_to: String,
}

/// 当前会话宾客。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionData {
    pub(crate) guest_id: u64,
    pub(crate) display_name: String,
    pub(crate) language: String,
}

/// 自助报名请求。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) language: Option<String>,
}

/// 自助报名返回数据。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterData {
    pub(crate) guest_id: u64,
    pub(crate) status: GuestStatus,
}
