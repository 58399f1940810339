//! 免密登录 access code 签发与校验。
//!
//! 格式：`<base36(day)>-<sig>-<base36(id)>`。`day` 为自 2001-01-01 起的天数，
//! `sig` 取 HMAC-SHA1 十六进制摘要的第 0、4、8… 位（共 10 位），
//! 以兼容已经发出的旧链接。

use std::sync::Arc;

use chrono::NaiveDate;
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};

use crate::{
    base36,
    clock::{Clock, SystemClock},
};

/// 签名域盐值，区分同一 secret 的其他用途。
pub const KEY_SALT: &str = "LoginTokenGenerator";

type HmacSha1 = Hmac<Sha1>;

/// 被授权的身份：稳定数字 ID + 邮箱（邮箱仅参与签名）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: u64,
    pub email: String,
}

impl Identity {
    pub fn new(id: u64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// 天数计数基准日。
pub fn login_token_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2001, 1, 1).expect("epoch date must be valid")
}

/// `date` 距 2001-01-01 的天数（更早日期为负数）。
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    date.signed_duration_since(login_token_epoch()).num_days()
}

/// 从 access code 中取出 `ID` 段（大小写不敏感）；格式不对返回 `None`。
pub fn token_identity_id(token: &str) -> Option<u64> {
    let mut parts = token.split('-');
    let (_, _, id_b36) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    base36::decode(id_b36)
}

/// access code 生成器。无内部可变状态，可跨线程共享。
#[derive(Clone)]
pub struct LoginTokenGenerator {
    mac: HmacSha1,
    max_age_days: u32,
    clock: Arc<dyn Clock>,
}

impl LoginTokenGenerator {
    /// 以 secret 与有效天数构造，默认使用系统时钟。
    pub fn new(secret: &str, max_age_days: u32) -> Self {
        let key = Sha1::digest(format!("{KEY_SALT}{secret}").as_bytes());
        let mac = HmacSha1::new_from_slice(&key).expect("hmac accepts keys of any length");
        Self {
            mac,
            max_age_days,
            clock: Arc::new(SystemClock),
        }
    }

    /// 替换日期来源。
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn max_age_days(&self) -> u32 {
        self.max_age_days
    }

    /// 当前日期对应的天数。
    pub fn today(&self) -> i64 {
        days_since_epoch(self.clock.today())
    }

    /// 以今天的天数签发 access code。
    ///
    /// # Panics
    ///
    /// 时钟日期早于 2001-01-01 时 panic。
    pub fn make_token(&self, identity: &Identity) -> String {
        let day = u64::try_from(self.today()).expect("clock date must not precede 2001-01-01");
        self.make_token_with_day(identity, day)
    }

    /// 以指定天数签发 access code；相同输入总是得到相同结果。
    pub fn make_token_with_day(&self, identity: &Identity, day: u64) -> String {
        let payload = format!("{}{}{}", identity.id, identity.email, day);
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let digest = hex_lower(&mac.finalize().into_bytes());
        let sig: String = digest.chars().step_by(4).collect();
        format!(
            "{}-{}-{}",
            base36::encode(day),
            sig,
            base36::encode(identity.id)
        )
    }

    /// 校验 access code：格式、签名、有效期全部通过才返回 `true`。
    ///
    /// 所有失败原因统一返回 `false`，不向调用方区分。
    pub fn check_token(&self, identity: Option<&Identity>, token: Option<&str>) -> bool {
        let (Some(identity), Some(token)) = (identity, token) else {
            return false;
        };
        if token.is_empty() {
            return false;
        }

        let parts: Vec<&str> = token.split('-').collect();
        let [ts_b36, _, _] = parts.as_slice() else {
            return false;
        };
        let Some(ts) = base36::decode(ts_b36) else {
            return false;
        };

        let expected = self.make_token_with_day(identity, ts);
        if !constant_time_eq(expected.as_bytes(), token.as_bytes()) {
            return false;
        }

        let Ok(ts) = i64::try_from(ts) else {
            return false;
        };
        self.today().saturating_sub(ts) <= i64::from(self.max_age_days)
    }
}

/// 定长比较，耗时与首个差异位置无关。
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write;
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Days, NaiveDate};

    use super::{
        Identity, LoginTokenGenerator, constant_time_eq, days_since_epoch, token_identity_id,
    };
    use crate::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn generator_on(today: NaiveDate, max_age_days: u32) -> LoginTokenGenerator {
        LoginTokenGenerator::new("s3cr3t", max_age_days).with_clock(Arc::new(FixedClock(today)))
    }

    fn guest() -> Identity {
        Identity::new(42, "a@b.com")
    }

    #[test]
    fn day_count_starts_at_2001() {
        assert_eq!(days_since_epoch(date(2001, 1, 1)), 0);
        assert_eq!(days_since_epoch(date(2001, 1, 2)), 1);
        assert_eq!(days_since_epoch(date(2024, 1, 15)), 8414);
        assert_eq!(days_since_epoch(date(2000, 12, 31)), -1);
    }

    #[test]
    fn fixed_vector_is_reproduced() {
        let generator = generator_on(date(2024, 1, 15), 180);
        let day = days_since_epoch(date(2024, 1, 15)) as u64;

        assert_eq!(
            generator.make_token_with_day(&guest(), day),
            "6hq-73507da68f-16"
        );
        assert_eq!(generator.make_token(&guest()), "6hq-73507da68f-16");
        assert_eq!(
            generator.make_token_with_day(&guest(), day + 1),
            "6hr-2e91a3be34-16"
        );
    }

    #[test]
    fn make_token_is_stable_within_a_day() {
        let generator = generator_on(date(2026, 10, 16), 180);
        let first = generator.make_token(&guest());
        let second = generator.make_token(&guest());
        assert_eq!(first, second);
        assert_eq!(token_identity_id(&first), Some(42));
    }

    #[test]
    fn token_within_window_is_accepted() {
        let today = date(2024, 1, 15);
        let generator = generator_on(today, 180);
        let today_day = days_since_epoch(today) as u64;
        for age in [0u64, 1, 90, 180] {
            let token = generator.make_token_with_day(&guest(), today_day - age);
            assert!(
                generator.check_token(Some(&guest()), Some(&token)),
                "age {age} should be accepted"
            );
        }
    }

    #[test]
    fn token_older_than_window_is_rejected() {
        let today = date(2024, 1, 15);
        let generator = generator_on(today, 180);
        let today_day = days_since_epoch(today) as u64;
        for age in [181u64, 365, 2000] {
            let token = generator.make_token_with_day(&guest(), today_day - age);
            assert!(!generator.check_token(Some(&guest()), Some(&token)));
        }
    }

    #[test]
    fn one_day_window_boundary() {
        let issued_on = date(2024, 1, 15);
        let token = generator_on(issued_on, 1).make_token(&guest());

        let next_day = issued_on.checked_add_days(Days::new(1)).expect("date");
        let two_days = issued_on.checked_add_days(Days::new(2)).expect("date");
        assert!(generator_on(next_day, 1).check_token(Some(&guest()), Some(&token)));
        assert!(!generator_on(two_days, 1).check_token(Some(&guest()), Some(&token)));
    }

    #[test]
    fn missing_inputs_fail_closed() {
        let generator = generator_on(date(2024, 1, 15), 180);
        let token = generator.make_token(&guest());
        assert!(!generator.check_token(Some(&guest()), None));
        assert!(!generator.check_token(None, Some(&token)));
        assert!(!generator.check_token(Some(&guest()), Some("")));
        assert!(!generator.check_token(None, None));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let generator = generator_on(date(2024, 1, 15), 180);
        for token in [
            "12345",
            "abc-123-123",
            "6hq-73507da68f",
            "6hq-73507da68f-16-16",
            "6h!-73507da68f-16",
            "-73507da68f-16",
            "6hq--16",
            "zzzzzzzzzzzzzz-73507da68f-16",
        ] {
            assert!(
                !generator.check_token(Some(&guest()), Some(token)),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn token_of_another_identity_is_rejected() {
        let generator = generator_on(date(2024, 1, 15), 180);
        let token = generator.make_token(&guest());
        assert!(!generator.check_token(Some(&Identity::new(43, "a@b.com")), Some(&token)));
        assert!(!generator.check_token(Some(&Identity::new(42, "x@b.com")), Some(&token)));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let today = date(2024, 1, 15);
        let other = LoginTokenGenerator::new("other", 180).with_clock(Arc::new(FixedClock(today)));
        let token = other.make_token(&guest());
        assert!(!generator_on(today, 180).check_token(Some(&guest()), Some(&token)));
    }

    #[test]
    fn uppercase_variant_does_not_match_signature() {
        let generator = generator_on(date(2024, 1, 15), 180);
        let token = generator.make_token(&guest()).to_uppercase();
        assert!(!generator.check_token(Some(&guest()), Some(&token)));
        assert_eq!(token_identity_id(&token), Some(42));
    }

    #[test]
    fn identity_id_requires_three_parts() {
        assert_eq!(token_identity_id("6hq-73507da68f-16"), Some(42));
        assert_eq!(token_identity_id("6hq-16"), None);
        assert_eq!(token_identity_id("a-b-c-d"), None);
        assert_eq!(token_identity_id("a-b-"), None);
    }

    #[test]
    #[should_panic(expected = "clock date must not precede 2001-01-01")]
    fn make_token_before_epoch_panics() {
        generator_on(date(2000, 12, 31), 180).make_token(&guest());
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(constant_time_eq(b"", b""));
    }
}
