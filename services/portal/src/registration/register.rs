//! 报名校验与入库。

use axum::http::StatusCode;
use tracing::{error, info, warn};

use crate::{
    api::{
        error::ApiError,
        types::{RegisterData, RegisterRequest},
    },
    guests::{GuestStatus, store::persist_guest_store},
    login::is_valid_email,
    state::AppState,
};

/// 可选语言。
const LANGUAGES: [&str; 2] = ["en", "es"];
const DEFAULT_LANGUAGE: &str = "es";

impl AppState {
    /// 登记待审核宾客并落盘；同一邮箱只能登记一次。
    pub(crate) async fn register_guest(
        &self,
        req: &RegisterRequest,
    ) -> Result<RegisterData, ApiError> {
        let first_name = req.first_name.trim();
        let last_name = req.last_name.trim();
        let email = req.email.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "FIELD_REQUIRED",
                "There were errors processing your form",
                "First and last name are required",
            ));
        }
        if !is_valid_email(email) {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "EMAIL_INVALID",
                "There were errors processing your form",
                "Enter a valid e-mail address",
            ));
        }
        let language = req
            .language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);
        if !LANGUAGES.contains(&language) {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "LANGUAGE_UNSUPPORTED",
                "There were errors processing your form",
                "Choose English (en) or Spanish (es)",
            ));
        }

        let mut store = self.guests.write().await;
        let Some(guest_id) = store.add_pending(email, first_name, last_name, language) else {
            info!(email, "registration for an e-mail already on the guest list");
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "GUEST_ALREADY_REGISTERED",
                "The email you used is already registered",
                "Try logging in",
            ));
        };
        if let Err(err) = persist_guest_store(&self.guest_store_path, &store) {
            store.guests.pop();
            error!(email, "persist registration failed: {err}");
            return Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "REGISTRATION_FAILED",
                "Your registration could not be saved",
                "Try again in a few minutes",
            ));
        }
        drop(store);

        warn!(
            guest_id,
            email,
            name = %format!("{first_name} {last_name}"),
            "new guest registered and requires attention"
        );
        Ok(RegisterData {
            guest_id,
            status: GuestStatus::Pending,
        })
    }
}
