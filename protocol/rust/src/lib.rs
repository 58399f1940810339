// 文件职责：
// 1) 提供宾客免密登录使用的 access code（`TS-SIG-ID`）签发与校验。
// 2) 提供 base36 编解码与可注入的日期时钟。
// 3) 作为 Rust 侧 access code 格式唯一代码源，供 portal 与 CLI 复用。

pub mod base36;
mod clock;
mod generator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{
    Identity, KEY_SALT, LoginTokenGenerator, days_since_epoch, login_token_epoch,
    token_identity_id,
};
