//! HTTP 接口类型、统一响应与错误。

pub(crate) mod error;
pub(crate) mod response;
pub(crate) mod types;
