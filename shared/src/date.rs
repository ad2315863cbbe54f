//! 时间类型模块
//!
//! 所有实体时间戳统一为 UTC 时间，序列化为 RFC 3339 字符串。

use chrono::{DateTime, Duration, Utc};

/// 实体时间戳（`createdAt` / `updatedAt`）
pub type Timestamp = DateTime<Utc>;

/// 获取当前时间
#[inline]
pub fn now() -> Timestamp {
    Utc::now()
}

/// 计算新的 `updatedAt`
///
/// 保证结果不早于 `previous`，即使系统时钟回拨。
pub fn touch(previous: Timestamp) -> Timestamp {
    now().max(previous)
}

/// `days` 天之前的时间
pub fn days_ago(days: i64) -> Timestamp {
    now() - Duration::days(days)
}
