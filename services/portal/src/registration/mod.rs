//! 宾客自助报名：加入名录并等待主人审核。

mod http;
mod register;

pub(crate) use http::register_handler;
