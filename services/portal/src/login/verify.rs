//! 凭 access code 登录。

use ow_login_token::token_identity_id;
use tracing::{debug, info};

use crate::{
    api::{
        error::ApiError,
        types::{LoginData, LoginRequest},
    },
    logging::code_fingerprint,
    state::AppState,
};

impl AppState {
    /// 校验 access code 并登录对应宾客。
    ///
    /// 格式错误、宾客不存在、签名不符、过期都返回同一个错误。
    pub(crate) async fn login_with_access_code(
        &self,
        req: &LoginRequest,
    ) -> Result<LoginData, ApiError> {
        let access_code = req.access_code.trim();
        let fingerprint = code_fingerprint(access_code);

        let Some(guest_id) = token_identity_id(access_code) else {
            debug!(code = %fingerprint, "reject access code: malformed");
            return Err(ApiError::access_code_invalid());
        };

        let guest = self.guests.read().await.find_by_id(guest_id).cloned();
        let Some(guest) = guest.filter(|guest| guest.is_approved()) else {
            debug!(guest_id, code = %fingerprint, "reject access code: no approved guest");
            return Err(ApiError::access_code_invalid());
        };

        if !self
            .tokens
            .check_token(Some(&guest.identity()), Some(access_code))
        {
            debug!(guest_id, code = %fingerprint, "reject access code: check failed");
            return Err(ApiError::access_code_invalid());
        }

        self.record_login(guest.id).await;
        info!(guest_id, code = %fingerprint, "guest logged in");
        Ok(LoginData {
            guest_id: guest.id,
            display_name: guest.display_name(),
            language: guest.language.clone(),
            redirect_to: sanitize_next(req.next.as_deref()),
        })
    }
}

/// 登录后跳转地址：只接受站内相对路径，其余回到首页。
pub(crate) fn sanitize_next(next: Option<&str>) -> String {
    let next = next.unwrap_or_default().trim();
    if next.is_empty() || next.starts_with("//") || next.contains("://") || next.contains('\\') {
        return "/".to_string();
    }
    if next.starts_with('/') {
        return next.to_string();
    }
    format!("/{next}")
}
