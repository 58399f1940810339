//! 申请 access code：按邮箱查宾客，签发并投递登录邮件。

use axum::http::StatusCode;
use tracing::{error, info, warn};

use crate::{
    api::{
        error::ApiError,
        types::{RequestCodeData, RequestCodeRequest},
    },
    logging::code_fingerprint,
    mail::compose_access_code_mail,
    state::AppState,
};

impl AppState {
    /// 为已确认宾客签发 access code 并发送邮件。
    pub(crate) async fn request_access_code(
        &self,
        req: &RequestCodeRequest,
    ) -> Result<RequestCodeData, ApiError> {
        let email = req.email.trim();
        if !is_valid_email(email) {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "EMAIL_INVALID",
                "There were errors processing your form",
                "Enter a valid e-mail address",
            ));
        }

        let guest = self.guests.read().await.find_by_email(email).cloned();
        let Some(guest) = guest else {
            warn!(email, "access code requested for an e-mail that is not on the guest list");
            return Err(ApiError::new(
                StatusCode::NOT_FOUND,
                "GUEST_NOT_FOUND",
                "That e-mail is not on our database",
                "Consider registering",
            ));
        };
        if !guest.is_approved() {
            info!(guest_id = guest.id, "access code requested by a guest pending review");
            return Err(ApiError::new(
                StatusCode::FORBIDDEN,
                "GUEST_PENDING_REVIEW",
                "We are reviewing your request to join the party",
                "Be patient",
            ));
        }

        let access_code = self.tokens.make_token(&guest.identity());
        let mail = compose_access_code_mail(&guest, &access_code, &self.site_url, &self.email_from);
        if let Err(err) = self.mailer.deliver(&mail) {
            error!(guest_id = guest.id, "deliver access code mail failed: {err:#}");
            return Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                "MAIL_DELIVERY_FAILED",
                "The access code could not be sent",
                "Try again in a few minutes",
            ));
        }

        info!(
            guest_id = guest.id,
            code = %code_fingerprint(&access_code),
            message_id = %mail.message_id,
            "access code sent"
        );
        Ok(RequestCodeData { sent: true })
    }
}

/// 邮箱格式粗校验：单个 `@`，本地部分非空，域名含内部 `.`，不含空白。
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
