//! 프롬프트 조합기
//!
//! 저장된 프롬프트 파트를 순서대로 이어 붙이고 `{name}` 형태의 플레이스홀더를
//! 사용자 선호 조건으로 치환합니다. 알 수 없는 플레이스홀더는 그대로 둡니다.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::dto::ItineraryRequest;
use crate::domain::prompt::PromptPart;
use crate::utils::error::AppError;

/// 비어 있는 선택 항목에 들어가는 문구
pub const NO_PREFERENCE: &str = "no specific preference";

/// intent가 없을 때의 여행 유형
const DEFAULT_TRIP_TYPE: &str = "general";

/// 파트 사이 구분자
const PART_SEPARATOR: &str = "\n\n";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-z_][a-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// 파트를 position, part_id 오름차순으로 이어 붙이고 플레이스홀더를 치환합니다.
pub fn assemble(parts: &[PromptPart], input: &ItineraryRequest) -> Result<String, AppError> {
    if parts.is_empty() {
        return Err(AppError::PromptsNotSeeded);
    }

    let mut ordered: Vec<&PromptPart> = parts.iter().collect();
    ordered.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.part_id.cmp(&b.part_id))
    });

    let values = placeholder_values(input);
    let merged = ordered
        .iter()
        .map(|part| substitute(&part.text, &values))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR);

    Ok(merged)
}

/// 인식 가능한 플레이스홀더와 치환 값
pub fn placeholder_values(input: &ItineraryRequest) -> HashMap<&'static str, String> {
    let location = location_phrase(&input.specific_places, &input.categories);
    let trip_type = input
        .intent
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TRIP_TYPE)
        .to_string();

    HashMap::from([
        ("from_location", or_no_preference(&input.from_location)),
        ("specific_location", location.clone()),
        ("destination", location),
        ("categories", join_list(&input.categories)),
        ("days", input.days.to_string()),
        ("currency", or_no_preference(&input.currency)),
        ("budget", or_no_preference(&input.budget)),
        ("intent", join_list(&input.intent)),
        ("group", or_no_preference(&input.group)),
        ("stay", or_no_preference(&input.stay)),
        ("notes", or_no_preference(&input.notes)),
        ("trip_type", trip_type),
    ])
}

fn substitute(text: &str, values: &HashMap<&'static str, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => value.clone(),
                None => {
                    tracing::debug!(placeholder = name, "Unknown placeholder left as-is");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// 방문지가 있으면 그대로, 없으면 카테고리를 이어서 사용합니다.
fn location_phrase(specific_places: &str, categories: &[String]) -> String {
    let places = specific_places.trim();
    if !places.is_empty() {
        return places.to_string();
    }
    join_list(categories)
}

fn join_list(items: &[String]) -> String {
    let joined = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    or_no_preference(&joined)
}

fn or_no_preference(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        NO_PREFERENCE.to_string()
    } else {
        value.to_string()
    }
}
