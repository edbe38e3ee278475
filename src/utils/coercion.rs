//! 값 변환 유틸리티
//!
//! 신뢰할 수 없는 업스트림 문자열을 숫자/표시용 값으로 변환한다.
//! 결측 표시("N/A", "None" 등)는 0 또는 "N/A" 로 취급하며 어떤 입력에도 패닉하지 않는다.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 업스트림이 결측값 대신 보내는 문자열 (trim 후 대소문자 구분 일치)
pub const SENTINELS: [&str; 6] = ["N/A", "NaN", "None", "--", "null", "undefined"];

fn is_sentinel(s: &str) -> bool {
    SENTINELS.contains(&s)
}

/// serde 필드용: 문자열/숫자/불리언은 문자열로, null 이나 그 밖의 값은 None
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// `lenient_string` 과 같되 없는 값은 빈 문자열
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// 문자열을 f64 로 변환. 결측/센티널/파싱 실패는 0.
pub fn parse_numeric(raw: Option<&str>) -> f64 {
    let s = match raw {
        Some(s) => s.trim(),
        None => return 0.0,
    };
    if s.is_empty() || is_sentinel(s) {
        return 0.0;
    }

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match numeric_prefix(&cleaned).parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// JSON 값 버전. 숫자는 그대로, 문자열은 `parse_numeric` 규칙으로 변환.
pub fn parse_numeric_value(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_numeric(Some(s)),
        _ => 0.0,
    }
}

/// Longest `-?digits(.digits)?` prefix, mirroring a lenient float parse.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    &s[..end]
}

/// 표시 가능한 값인지 여부
pub fn is_displayable(raw: Option<&str>) -> bool {
    match raw {
        Some(s) => {
            let s = s.trim();
            !s.is_empty() && !is_sentinel(s)
        }
        None => false,
    }
}

/// 날짜 문자열을 epoch 밀리초로 변환 (시간대 없는 값은 UTC 로 간주)
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

fn with_suffix(value: f64) -> Option<(f64, &'static str)> {
    let abs = value.abs();
    if abs >= 1e12 {
        Some((value / 1e12, "T"))
    } else if abs >= 1e9 {
        Some((value / 1e9, "B"))
    } else if abs >= 1e6 {
        Some((value / 1e6, "M"))
    } else if abs >= 1e3 {
        Some((value / 1e3, "K"))
    } else {
        None
    }
}

/// 정수부에 천 단위 구분 쉼표 추가
fn group_thousands(int_part: &str) -> String {
    let digits = int_part.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*d as char);
    }
    out
}

/// Up to two fraction digits, grouped, trailing zeros trimmed. Sign not included.
fn format_plain(abs_value: f64) -> String {
    let fixed = format!("{:.2}", abs_value);
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        group_thousands(int_part)
    } else {
        format!("{}.{}", group_thousands(int_part), frac)
    }
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

/// 통화 포맷 (K/M/B/T 축약). 0 은 "N/A".
pub fn format_currency(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "N/A".to_string();
    }
    match with_suffix(value) {
        Some((scaled, suffix)) => format!("{}${:.2}{}", sign(value), scaled.abs(), suffix),
        None => {
            let fixed = format!("{:.2}", value.abs());
            format!("{}${}", sign(value), fixed)
        }
    }
}

/// 퍼센트 포맷. (-1, 1) 구간의 값은 비율로 보고 100 을 곱한다.
pub fn format_percentage(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "N/A".to_string();
    }
    let percent = if value > -1.0 && value < 1.0 { value * 100.0 } else { value };
    format!("{:.2}%", percent)
}

/// 숫자면 최대 소수 2자리로, 아니면 원문 그대로
pub fn format_value(raw: Option<&str>) -> String {
    if !is_displayable(raw) {
        return "N/A".to_string();
    }
    let s = raw.unwrap_or_default().trim();
    let stripped: String = s.chars().filter(|c| !matches!(c, ',' | '$' | '%' | ' ')).collect();
    match stripped.parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => format!("{}{}", sign(v), format_plain(v.abs())),
        _ => s.to_string(),
    }
}

/// 큰 수 축약 포맷 (통화 기호 없음)
pub fn format_large_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "N/A".to_string();
    }
    match with_suffix(value) {
        Some((scaled, suffix)) => format!("{:.2}{}", scaled, suffix),
        None => format!("{}{}", sign(value), format_plain(value.abs())),
    }
}

/// 등락 표시: `+$1.23 (+4.56%)`
pub fn format_change(change: f64, percent: f64) -> String {
    if !change.is_finite() || !percent.is_finite() {
        return "N/A".to_string();
    }
    let prefix = if change >= 0.0 { "+" } else { "-" };
    format!("{}${:.2} ({}{:.2}%)", prefix, change.abs(), prefix, percent.abs())
}

/// 날짜 표시: `Mar 4, 2024`
pub fn format_date(raw: Option<&str>) -> String {
    raw.filter(|s| is_displayable(Some(*s)))
        .and_then(parse_timestamp)
        .map(|ts| crate::utils::format_timestamp(ts, "%b %-d, %Y"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "N/A".to_string())
}
