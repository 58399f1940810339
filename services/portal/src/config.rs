//! 配置模块职责：
//! 1. 读取 portal 运行所需的环境变量，并提供默认值。
//! 2. 校验签名密钥、站点地址与 access code 有效天数。
//! 3. 解析宾客名录文件路径。

use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use url::Url;

/// 默认监听地址。
pub(crate) const DEFAULT_ADDR: &str = "0.0.0.0:8000";
/// 默认站点地址（用于拼接登录链接）。
pub(crate) const DEFAULT_SITE_URL: &str = "http://127.0.0.1:8000";
/// access code 默认有效天数。
pub(crate) const DEFAULT_TOKEN_MAX_AGE_DAYS: u32 = 180;
/// 默认发件人。
pub(crate) const DEFAULT_EMAIL_FROM: &str = "Camila & Aquiles <camiyaqui@camiyaqui.com>";

const ADDR_ENV: &str = "PORTAL_ADDR";
const SECRET_KEY_ENV: &str = "WEDDING_SECRET_KEY";
const MAX_AGE_ENV: &str = "LOGIN_TOKEN_TIMEOUT_DAYS";
const SITE_URL_ENV: &str = "WEDDING_SITE_URL";
const EMAIL_FROM_ENV: &str = "WEDDING_EMAIL_FROM";
const GUEST_STORE_PATH_ENV: &str = "PORTAL_GUEST_STORE_PATH";

/// Portal 运行时配置。
#[derive(Clone)]
pub(crate) struct PortalConfig {
    /// HTTP 监听地址。
    pub(crate) addr: String,
    /// access code 签名密钥，启动后只读。
    pub(crate) secret_key: String,
    /// access code 有效天数。
    pub(crate) token_max_age_days: u32,
    /// 站点公开地址。
    pub(crate) site_url: Url,
    /// 邮件发件人与回复地址。
    pub(crate) email_from: String,
    /// 宾客名录文件路径。
    pub(crate) guest_store_path: PathBuf,
}

impl PortalConfig {
    /// 从进程环境变量加载配置。
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key-value 来源加载配置。
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let Some(secret_key) = read(SECRET_KEY_ENV) else {
            bail!("{SECRET_KEY_ENV} must be set to a non-empty value");
        };

        let token_max_age_days = match read(MAX_AGE_ENV) {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("invalid {MAX_AGE_ENV}: {raw}"))?,
            None => DEFAULT_TOKEN_MAX_AGE_DAYS,
        };

        let site_raw = read(SITE_URL_ENV).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let site_url = parse_site_url(&site_raw)?;

        let guest_store_path = match read(GUEST_STORE_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_guest_store_path(read("HOME")),
        };

        Ok(Self {
            addr: read(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            secret_key,
            token_max_age_days,
            site_url,
            email_from: read(EMAIL_FROM_ENV).unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            guest_store_path,
        })
    }
}

/// 校验站点地址：必须是 http(s) 绝对地址。
fn parse_site_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid {SITE_URL_ENV}: {raw}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!(
            "{SITE_URL_ENV} must use http or https, got {other}"
        )),
    }
}

/// 默认宾客名录路径：`$HOME/.config/ourwedding/portal/guests.json`。
fn default_guest_store_path(home: Option<String>) -> PathBuf {
    PathBuf::from(home.unwrap_or_else(|| ".".to_string()))
        .join(".config")
        .join("ourwedding")
        .join("portal")
        .join("guests.json")
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::PathBuf};

    use super::{DEFAULT_ADDR, DEFAULT_TOKEN_MAX_AGE_DAYS, PortalConfig};

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<PortalConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PortalConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("WEDDING_SECRET_KEY", "s3cr3t"), ("HOME", "/home/guest")])
            .expect("config should load");
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.secret_key, "s3cr3t");
        assert_eq!(config.token_max_age_days, DEFAULT_TOKEN_MAX_AGE_DAYS);
        assert_eq!(config.site_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(
            config.guest_store_path,
            PathBuf::from("/home/guest/.config/ourwedding/portal/guests.json")
        );
    }

    #[test]
    fn missing_or_blank_secret_is_fatal() {
        assert!(load(&[]).is_err());
        assert!(load(&[("WEDDING_SECRET_KEY", "   ")]).is_err());
    }

    #[test]
    fn max_age_is_parsed() {
        let config = load(&[
            ("WEDDING_SECRET_KEY", "s3cr3t"),
            ("LOGIN_TOKEN_TIMEOUT_DAYS", "1"),
        ])
        .expect("config should load");
        assert_eq!(config.token_max_age_days, 1);

        assert!(
            load(&[
                ("WEDDING_SECRET_KEY", "s3cr3t"),
                ("LOGIN_TOKEN_TIMEOUT_DAYS", "-3"),
            ])
            .is_err()
        );
    }

    #[test]
    fn site_url_must_be_http() {
        assert!(
            load(&[
                ("WEDDING_SECRET_KEY", "s3cr3t"),
                ("WEDDING_SITE_URL", "ftp://camiyaqui.com"),
            ])
            .is_err()
        );
        assert!(
            load(&[
                ("WEDDING_SECRET_KEY", "s3cr3t"),
                ("WEDDING_SITE_URL", "not a url"),
            ])
            .is_err()
        );
        let config = load(&[
            ("WEDDING_SECRET_KEY", "s3cr3t"),
            ("WEDDING_SITE_URL", "https://camiyaqui.com"),
        ])
        .expect("config should load");
        assert_eq!(config.site_url.as_str(), "https://camiyaqui.com/");
    }

    #[test]
    fn explicit_store_path_wins() {
        let config = load(&[
            ("WEDDING_SECRET_KEY", "s3cr3t"),
            ("PORTAL_GUEST_STORE_PATH", "/srv/guests.json"),
        ])
        .expect("config should load");
        assert_eq!(config.guest_store_path, PathBuf::from("/srv/guests.json"));
    }
}
