//! Portal 状态：签名器、宾客名录与邮件出口句柄。

use std::{path::PathBuf, sync::Arc};

use anyhow::anyhow;
use ow_login_token::LoginTokenGenerator;
use tokio::sync::RwLock;
use tracing::warn;
use url::Url;

use crate::{
    config::PortalConfig,
    guests::{
        GuestStore,
        store::{load_guest_store, persist_guest_store},
    },
    mail::{LogMailSink, MailSink},
    session::session_key,
};

/// Portal 共享状态。
#[derive(Clone)]
pub(crate) struct AppState {
    /// access code 签发/校验器（只读）。
    pub(crate) tokens: Arc<LoginTokenGenerator>,
    /// 宾客名录（持久化）。
    pub(crate) guests: Arc<RwLock<GuestStore>>,
    /// 宾客名录文件路径。
    pub(crate) guest_store_path: Arc<PathBuf>,
    /// 邮件出口。
    pub(crate) mailer: Arc<dyn MailSink>,
    /// 站点公开地址。
    pub(crate) site_url: Arc<Url>,
    /// 发件人。
    pub(crate) email_from: Arc<str>,
    /// 会话 cookie 签名密钥。
    pub(crate) session_key: Arc<str>,
    /// 站点走 https 时会话 cookie 带 `Secure`。
    pub(crate) session_secure: bool,
}

impl AppState {
    /// 按配置装配状态：加载宾客名录，邮件写入日志。
    pub(crate) fn from_config(config: &PortalConfig) -> anyhow::Result<Self> {
        let store = load_guest_store(&config.guest_store_path).map_err(|err| {
            anyhow!(
                "load guest store {} failed: {err}",
                config.guest_store_path.display()
            )
        })?;
        let tokens = LoginTokenGenerator::new(&config.secret_key, config.token_max_age_days);
        Ok(Self::new(
            tokens,
            &session_key(&config.secret_key),
            store,
            config.guest_store_path.clone(),
            Arc::new(LogMailSink),
            config.site_url.clone(),
            &config.email_from,
        ))
    }

    pub(crate) fn new(
        tokens: LoginTokenGenerator,
        session_key: &str,
        store: GuestStore,
        guest_store_path: PathBuf,
        mailer: Arc<dyn MailSink>,
        site_url: Url,
        email_from: &str,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            guests: Arc::new(RwLock::new(store)),
            guest_store_path: Arc::new(guest_store_path),
            mailer,
            session_secure: site_url.scheme() == "https",
            site_url: Arc::new(site_url),
            email_from: Arc::from(email_from),
            session_key: Arc::from(session_key),
        }
    }

    /// 更新宾客最近登录时间并落盘；落盘失败仅告警。
    pub(crate) async fn record_login(&self, guest_id: u64) {
        let mut store = self.guests.write().await;
        if !store.touch_last_login(guest_id, chrono::Utc::now().to_rfc3339()) {
            return;
        }
        if let Err(err) = persist_guest_store(&self.guest_store_path, &store) {
            warn!("persist guest last_login failed: {err}");
        }
    }

    /// 宾客数量。
    pub(crate) async fn guest_count(&self) -> usize {
        self.guests.read().await.guests.len()
    }
}
