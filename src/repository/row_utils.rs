// ==========================================
// 工位轮岗排班 - 行映射工具
// ==========================================
// 用途: 日期/时间/枚举列的统一解析,解析失败按 rusqlite 转换错误上抛
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;

/// 日期落库格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// 解析可空日期列
pub fn parse_optional_date(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

/// 解析 RFC3339 时间戳列
pub fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 解析枚举文本列
pub fn parse_enum<T>(idx: usize, raw: &str, parse: impl Fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("未知的枚举值: {}", raw).into(),
        )
    })
}
