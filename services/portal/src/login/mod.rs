//! 免密登录：申请 access code、凭 access code 登录与会话查询。

mod http;
mod request_code;
mod verify;

pub(crate) use http::{login_handler, login_link_handler, me_handler, request_code_handler};
pub(crate) use request_code::is_valid_email;
