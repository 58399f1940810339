//! 日期时钟：access code 以“天”为粒度，只需要当前日历日期。

use chrono::{NaiveDate, Utc};

/// 提供“今天”的日期来源。
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 系统时钟（UTC 日历日期）。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// 固定日期时钟，用于测试与离线校验。
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
