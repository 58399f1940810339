//! 宾客会话 cookie：`ows_v1.<payload_b64url>.<sig_b64url>`，HMAC-SHA256 签名。

use axum::http::{HeaderMap, header::COOKIE};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use crate::{
    api::{error::ApiError, types::SessionData},
    state::AppState,
};

/// 会话 cookie 名。
pub(crate) const SESSION_COOKIE: &str = "ow_session";
/// 会话有效期（秒）。
pub(crate) const SESSION_TTL_SEC: u64 = 30 * 24 * 3600;
/// 会话签名域盐值，与 access code 的签名域分开。
const SESSION_KEY_SALT: &str = "GuestSession";
const SESSION_VERSION: &str = "ows_v1";

type HmacSha256 = Hmac<Sha256>;

/// 会话 claims。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GuestSession {
    /// 宾客 ID。
    pub(crate) gid: u64,
    /// 宾客语言。
    pub(crate) lang: String,
    pub(crate) iat: u64,
    pub(crate) exp: u64,
}

/// 当前 unix 秒。
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 由站点密钥派生会话签名密钥。
pub(crate) fn session_key(secret: &str) -> String {
    format!("{SESSION_KEY_SALT}{secret}")
}

/// 签发会话值。
pub(crate) fn issue_session(key: &str, guest_id: u64, language: &str, now: u64) -> String {
    let claims = GuestSession {
        gid: guest_id,
        lang: language.to_string(),
        iat: now,
        exp: now.saturating_add(SESSION_TTL_SEC),
    };
    let payload = serde_json::to_string(&claims).expect("session claims must be serializable");
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("hmac key should be valid");
    mac.update(payload_b64.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{SESSION_VERSION}.{payload_b64}.{sig_b64}")
}

/// 校验会话值；任何失败返回 `None`。
pub(crate) fn verify_session(value: &str, key: &str, now: u64) -> Option<GuestSession> {
    let mut parts = value.split('.');
    let version = parts.next()?;
    let payload_b64 = parts.next()?;
    let sig_b64 = parts.next()?;
    if version != SESSION_VERSION || payload_b64.is_empty() || parts.next().is_some() {
        return None;
    }

    let sig = URL_SAFE_NO_PAD.decode(sig_b64.as_bytes()).ok()?;
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).ok()?;
    mac.update(payload_b64.as_bytes());
    mac.verify_slice(&sig).ok()?;

    let payload_raw = URL_SAFE_NO_PAD.decode(payload_b64.as_bytes()).ok()?;
    let claims: GuestSession = serde_json::from_slice(&payload_raw).ok()?;
    (claims.exp > now).then_some(claims)
}

/// `Set-Cookie` 值。
pub(crate) fn session_cookie(value: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={value}; Path=/; Max-Age={SESSION_TTL_SEC}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// 从请求 `Cookie` 头中取出会话值。
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

impl AppState {
    /// 为已登录宾客签发会话 cookie（`Set-Cookie` 值）。
    pub(crate) fn session_cookie_for(&self, guest_id: u64, language: &str) -> String {
        let value = issue_session(&self.session_key, guest_id, language, unix_now());
        session_cookie(&value, self.session_secure)
    }

    /// 由请求 cookie 解析当前宾客；宾客须仍在名录中且已确认。
    pub(crate) async fn current_guest(
        &self,
        headers: &HeaderMap,
    ) -> Result<SessionData, ApiError> {
        let Some(session) = session_from_headers(headers)
            .and_then(|value| verify_session(value, &self.session_key, unix_now()))
        else {
            return Err(ApiError::session_invalid());
        };

        let guests = self.guests.read().await;
        let Some(guest) = guests
            .find_by_id(session.gid)
            .filter(|guest| guest.is_approved())
        else {
            debug!(guest_id = session.gid, "reject session: no approved guest");
            return Err(ApiError::session_invalid());
        };
        Ok(SessionData {
            guest_id: guest.id,
            display_name: guest.display_name(),
            language: guest.language.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{HeaderMap, HeaderValue, StatusCode, header::COOKIE};
    use chrono::NaiveDate;

    use super::{
        SESSION_TTL_SEC, issue_session, session_cookie, session_from_headers, session_key,
        unix_now, verify_session,
    };
    use crate::{
        guests::GuestStatus,
        state::{
            AppState,
            test_support::{RecordingMailSink, guest, state_on},
        },
    };

    const NOW: u64 = 1_790_000_000;

    #[test]
    fn issued_session_verifies_until_expiry() {
        let key = session_key("s3cr3t");
        let value = issue_session(&key, 7, "es", NOW);
        assert!(value.starts_with("ows_v1."));

        let session = verify_session(&value, &key, NOW + 10).expect("session should verify");
        assert_eq!(session.gid, 7);
        assert_eq!(session.lang, "es");
        assert!(verify_session(&value, &key, NOW + SESSION_TTL_SEC).is_none());
    }

    #[test]
    fn tampered_or_foreign_session_is_rejected() {
        let key = session_key("s3cr3t");
        let value = issue_session(&key, 7, "es", NOW);
        assert!(verify_session(&value, &session_key("other"), NOW).is_none());

        let forged = issue_session(&session_key("other"), 1, "en", NOW);
        let (_, forged_sig) = forged.rsplit_once('.').expect("three parts");
        let (head, _) = value.rsplit_once('.').expect("three parts");
        assert!(verify_session(&format!("{head}.{forged_sig}"), &key, NOW).is_none());

        let extended = format!("{value}.extra");
        for raw in ["", "ows_v1", "ows_v1..", "yat_v1.a.b", extended.as_str()] {
            assert!(verify_session(raw, &key, NOW).is_none(), "{raw:?}");
        }
    }

    #[test]
    fn cookie_round_trips_through_headers() {
        let cookie = session_cookie("ows_v1.abc.def", true);
        assert!(cookie.starts_with("ow_session=ows_v1.abc.def;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("; Secure"));
        assert!(!session_cookie("v", false).contains("Secure"));

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; ow_session=ows_v1.abc.def; lang=es"),
        );
        assert_eq!(session_from_headers(&headers), Some("ows_v1.abc.def"));
        assert_eq!(session_from_headers(&HeaderMap::new()), None);
    }

    fn state() -> AppState {
        state_on(
            NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"),
            180,
            vec![
                guest(7, "lala@lolo.com", GuestStatus::Approved),
                guest(8, "pending@lolo.com", GuestStatus::Pending),
            ],
            Arc::new(RecordingMailSink::default()),
        )
    }

    fn cookie_header(set_cookie: &str) -> HeaderMap {
        let pair = set_cookie.split(';').next().expect("name=value");
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(pair).expect("header value"));
        headers
    }

    #[tokio::test]
    async fn issued_cookie_resolves_current_guest() {
        let state = state();
        let set_cookie = state.session_cookie_for(7, "en");
        assert!(set_cookie.ends_with("; Secure"));

        let me = state
            .current_guest(&cookie_header(&set_cookie))
            .await
            .expect("session should resolve");
        assert_eq!(me.guest_id, 7);
        assert_eq!(me.display_name, "Aquiles Carattino");
        assert_eq!(me.language, "en");
    }

    #[tokio::test]
    async fn session_of_missing_or_pending_guest_is_rejected() {
        let state = state();
        assert_eq!(
            state
                .current_guest(&HeaderMap::new())
                .await
                .expect_err("no cookie")
                .status,
            StatusCode::UNAUTHORIZED
        );

        for guest_id in [8, 99] {
            let value = issue_session(&state.session_key, guest_id, "en", unix_now());
            let err = state
                .current_guest(&cookie_header(&format!("ow_session={value}")))
                .await
                .expect_err("session should be rejected");
            assert_eq!(err.code, "SESSION_INVALID");
        }
    }
}
