//! 时间工具 - 时钟抽象与业务时区
//!
//! 引擎内部所有 "现在" 都来自注入的 [`Clock`]，repository 层只接收 `i64` Unix millis。

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::core::{EngineError, EngineResult};

/// Source of the current time
///
/// Injected so that the current-occupant rule can be tested at fixed instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self::new(time.timestamp_millis())
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.millis.fetch_add(minutes * 60_000, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| EngineError::invalid(format!("Invalid date format: {date}")))
}

/// 解析业务时区，失败回退 UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 本地零点不存在时按 UTC 计算。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 当前营业日的 `[start, end)` (业务时区)
pub fn business_day_bounds(now_millis: i64, tz: Tz) -> (i64, i64) {
    let today = DateTime::from_timestamp_millis(now_millis)
        .unwrap_or_default()
        .with_timezone(&tz)
        .date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    (day_start_millis(today, tz), day_start_millis(tomorrow, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance_minutes(2);
        assert_eq!(clock.now_millis(), 121_000);
        clock.set(5);
        assert_eq!(clock.now().timestamp_millis(), 5);
    }

    #[test]
    fn test_business_day_bounds_follow_timezone() {
        let tz: Tz = "America/Bogota".parse().unwrap();
        // 2025-03-10 03:00 UTC is still 2025-03-09 22:00 in Bogota (UTC-5)
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 3, 0, 0).unwrap().timestamp_millis();
        let (start, end) = business_day_bounds(now, tz);
        let expected_start = Utc.with_ymd_and_hms(2025, 3, 9, 5, 0, 0).unwrap().timestamp_millis();
        assert_eq!(start, expected_start);
        assert_eq!(end - start, 24 * 3_600_000);
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-02-30").is_err());
        assert_eq!(
            parse_date("2025-12-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        assert_eq!(parse_timezone("Mars/Olympus"), Tz::UTC);
    }
}
