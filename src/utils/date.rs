//! 课程日期解析与格式化
//!
//! 不带偏移量的日期字符串按课程时区解释。

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{GradingError, Result};

/// 课程日期的存储格式，如 `2026-09-01 23:59:59+0800`
pub const COURSE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S%:z"];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// 课程时区：IANA 时区名或固定偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl CourseTimezone {
    pub fn utc() -> Self {
        CourseTimezone::Fixed(Utc.fix())
    }

    /// 将本地时间解释为课程时区时间
    ///
    /// 夏令时回拨产生的重复时间取较早的一个；拨快跳过的时间返回 None。
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            CourseTimezone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|value| value.fixed_offset()),
            CourseTimezone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

impl Default for CourseTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl From<FixedOffset> for CourseTimezone {
    fn from(offset: FixedOffset) -> Self {
        CourseTimezone::Fixed(offset)
    }
}

impl From<Tz> for CourseTimezone {
    fn from(tz: Tz) -> Self {
        CourseTimezone::Named(tz)
    }
}

impl fmt::Display for CourseTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseTimezone::Named(tz) => write!(f, "{}", tz.name()),
            CourseTimezone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// 解析时区字符串
///
/// 支持 `UTC` / `Z`、`+08:00`、`-0500` 形式的固定偏移，以及
/// `America/New_York` 这类 IANA 时区名。
pub fn parse_timezone(value: &str) -> Result<CourseTimezone> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value == "Z" {
        return Ok(CourseTimezone::utc());
    }

    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => {
            return value.parse::<Tz>().map(CourseTimezone::Named).map_err(|_| {
                GradingError::date_parse(format!("Unsupported timezone '{value}'"))
            });
        }
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(GradingError::date_parse(format!(
            "Unsupported timezone '{value}'"
        )));
    }
    let hours: i32 = digits[..2].parse().unwrap_or_default();
    let minutes: i32 = digits[2..].parse().unwrap_or_default();

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(CourseTimezone::Fixed)
        .ok_or_else(|| GradingError::date_parse(format!("Timezone '{value}' out of range")))
}

/// 解析课程日期字符串
pub fn parse_course_date(value: &str, timezone: CourseTimezone) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GradingError::date_parse("Empty date-time string"));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| GradingError::date_parse(format!("Unparsable date-time '{value}'")))?;

    timezone.localize(&naive).ok_or_else(|| {
        GradingError::date_parse(format!("Date-time '{value}' does not exist in {timezone}"))
    })
}

/// 按课程存储格式输出日期
pub fn format_course_date(value: &DateTime<FixedOffset>) -> String {
    value.format(COURSE_DATE_FORMAT).to_string()
}
