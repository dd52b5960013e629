//! AI 응답 추출기
//!
//! 모델 응답은 설명 문장이나 코드 펜스로 JSON을 감싸는 경우가 많습니다.
//! 1단계에서 괄호 균형을 따라 후보 구간을 잘라내고, 2단계에서 엄격하게 파싱한 뒤,
//! 명시적인 스키마(`RawItinerary`)로 일정 형태를 검증합니다.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::dto::{Activity, DayPlan, ItineraryResult};
use super::navigation::maps_link;
use crate::utils::error::AppError;

/// 에러 응답에 포함할 원문 최대 길이 (문자 수)
pub const RAW_EXCERPT_LIMIT: usize = 500;

/// 추출 단계별 실패 사유
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON object or array found in model reply")]
    NoJsonFound,
    #[error("malformed JSON in model reply: {0}")]
    Malformed(String),
    #[error("itinerary shape mismatch: {0}")]
    Schema(String),
}

impl ExtractError {
    /// 파싱 실패는 `AiResponseParseFailed`, 형태 불일치는 `ItineraryValidationFailed`
    pub fn into_app_error(self, raw: &str) -> AppError {
        let raw_excerpt = excerpt(raw);
        match self {
            ExtractError::NoJsonFound | ExtractError::Malformed(_) => {
                AppError::AiResponseParseFailed {
                    reason: self.to_string(),
                    raw_excerpt,
                }
            }
            ExtractError::Schema(_) => AppError::ItineraryValidationFailed {
                reason: self.to_string(),
                raw_excerpt,
            },
        }
    }
}

/// 모델 응답에서 일정을 추출하고 요청 일수와 맞는지 검증합니다.
pub fn extract_itinerary(raw: &str, expected_days: u32) -> Result<ItineraryResult, AppError> {
    let value = extract_json(raw).map_err(|e| e.into_app_error(raw))?;
    map_itinerary(value, expected_days).map_err(|e| e.into_app_error(raw))
}

/// 응답 텍스트에서 첫 번째로 파싱 가능한 JSON 객체(또는 객체 배열)를 찾습니다.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let mut last_error: Option<String> = None;
    let mut cursor = 0;

    while let Some(offset) = raw[cursor..].find(['{', '[']) {
        let start = cursor + offset;
        match balanced_end(raw, start) {
            Some(end) => {
                let candidate = &raw[start..=end];
                match parse_candidate(candidate) {
                    Ok(value) if is_structured(&value) => return Ok(value),
                    Ok(_) => last_error = Some("JSON fragment is not an object".to_string()),
                    Err(e) => last_error = Some(e),
                }
                cursor = end + 1;
            }
            None => {
                // 닫히지 않은 후보: 문장 속 괄호이거나 잘린 응답. 다음 괄호부터 다시 찾습니다.
                last_error = Some("unterminated JSON value".to_string());
                cursor = start + 1;
            }
        }
    }

    Err(match last_error {
        Some(reason) => ExtractError::Malformed(reason),
        None => ExtractError::NoJsonFound,
    })
}

/// `start`의 여는 괄호와 짝이 맞는 닫는 괄호 위치를 반환합니다.
///
/// 문자열 리터럴 안의 괄호와 이스케이프는 건너뜁니다. 짝이 맞지 않는 닫는 괄호를
/// 만나면 그 위치에서 후보를 끝냅니다(파싱 단계에서 실패).
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(b) {
                    return Some(i);
                }
                if stack.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// 엄격 파싱 후 실패하면 후행 쉼표를 제거하고 한 번 더 시도합니다.
fn parse_candidate(candidate: &str) -> Result<Value, String> {
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            let repaired = strip_trailing_commas(candidate);
            if repaired == candidate {
                return Err(strict_err.to_string());
            }
            serde_json::from_str(&repaired).map_err(|_| strict_err.to_string())
        }
    }
}

fn is_structured(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

/// 문자열 밖에서 `}` 또는 `]` 바로 앞(공백 허용)에 오는 쉼표를 제거합니다.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// 원문 앞부분 (문자 경계 기준)
pub fn excerpt(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(RAW_EXCERPT_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

// ===== 스키마 =====

#[derive(Debug, Deserialize)]
struct RawItinerary {
    days: Vec<RawDayPlan>,
}

#[derive(Debug, Deserialize)]
struct RawDayPlan {
    #[serde(deserialize_with = "day_number")]
    day: u32,
    #[serde(default, deserialize_with = "text")]
    date: String,
    #[serde(default, deserialize_with = "text")]
    title: String,
    #[serde(default, deserialize_with = "text")]
    summary: String,
    #[serde(default, deserialize_with = "activities")]
    activities: Vec<RawActivity>,
    #[serde(default, deserialize_with = "text")]
    accommodation: String,
    #[serde(default, deserialize_with = "text")]
    travel_notes: String,
    #[serde(default, deserialize_with = "text")]
    rough_cost: String,
}

#[derive(Debug, Deserialize)]
struct RawActivity {
    #[serde(default, deserialize_with = "text")]
    time: String,
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(default, deserialize_with = "text")]
    description: String,
    #[serde(default, deserialize_with = "text")]
    duration: String,
    #[serde(default, deserialize_with = "text")]
    cost_estimate: String,
    #[serde(default, deserialize_with = "text_list")]
    bookings: Vec<String>,
    #[serde(default, alias = "place", alias = "place_name", deserialize_with = "text")]
    location: String,
}

/// 문자열, 숫자, 불리언, null을 문자열로 받아들입니다.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!("expected text, found {}", kind(&other)))),
    }
}

fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.trim().to_string()]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(de::Error::custom(format!(
                    "expected text in list, found {}",
                    kind(&other)
                ))),
            })
            .collect(),
        other => Err(de::Error::custom(format!("expected list, found {}", kind(&other)))),
    }
}

fn activities<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawActivity>, D::Error> {
    Option::<Vec<RawActivity>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// 정수 또는 숫자 문자열("2")을 일차로 받아들입니다.
fn day_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| de::Error::custom(format!("invalid day number: {}", value)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 파싱된 JSON을 일정으로 변환하고 일차를 검증합니다.
fn map_itinerary(value: Value, expected_days: u32) -> Result<ItineraryResult, ExtractError> {
    let value = match value {
        Value::Array(days) => serde_json::json!({ "days": days }),
        Value::Object(map) if map.contains_key("days") => Value::Object(map),
        _ => return Err(ExtractError::Schema("missing `days` array".to_string())),
    };

    let raw: RawItinerary =
        serde_json::from_value(value).map_err(|e| ExtractError::Schema(e.to_string()))?;

    let mut days = raw.days;
    days.sort_by_key(|d| d.day);

    let indices: Vec<u32> = days.iter().map(|d| d.day).collect();
    let contiguous = indices
        .iter()
        .enumerate()
        .all(|(i, &day)| day as usize == i + 1);
    if !contiguous {
        return Err(ExtractError::Schema(format!(
            "day indices must be contiguous from 1, got {:?}",
            indices
        )));
    }
    if days.len() != expected_days as usize {
        return Err(ExtractError::Schema(format!(
            "expected {} days, got {}",
            expected_days,
            days.len()
        )));
    }

    Ok(ItineraryResult {
        days: days.into_iter().map(into_day_plan).collect(),
    })
}

fn into_day_plan(raw: RawDayPlan) -> DayPlan {
    DayPlan {
        day: raw.day,
        date: raw.date,
        title: raw.title,
        summary: raw.summary,
        activities: raw.activities.into_iter().map(into_activity).collect(),
        accommodation: raw.accommodation,
        travel_notes: raw.travel_notes,
        rough_cost: raw.rough_cost,
    }
}

/// 장소명이 있으면 그것으로, 없으면 제목으로 지도 링크를 만듭니다.
fn into_activity(raw: RawActivity) -> Activity {
    let location = if raw.location.is_empty() {
        raw.title.clone()
    } else {
        raw.location
    };
    let map_link = if location.is_empty() {
        String::new()
    } else {
        maps_link(&location)
    };

    Activity {
        time: raw.time,
        title: raw.title,
        description: raw.description,
        duration: raw.duration,
        cost_estimate: raw.cost_estimate,
        bookings: raw.bookings,
        location,
        map_link,
    }
}
