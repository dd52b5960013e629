use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::prompt_part;

/// 저장된 프롬프트 파트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PromptPart {
    /// 파트 식별자 (고유)
    #[schema(example = "core_itinerary")]
    pub part_id: String,

    /// 조합 순서
    #[schema(example = 1)]
    pub position: i32,

    #[schema(example = "Core Itinerary Generator")]
    pub title: String,

    /// `{days}`, `{from_location}` 등의 플레이스홀더를 포함할 수 있는 본문
    #[schema(example = "Design a detailed {days}-day travel itinerary starting from {from_location}.")]
    pub text: String,

    pub updated_at: NaiveDateTime,
}

impl From<prompt_part::Model> for PromptPart {
    fn from(model: prompt_part::Model) -> Self {
        Self {
            part_id: model.part_id,
            position: model.position,
            title: model.title,
            text: model.text,
            updated_at: model.updated_at,
        }
    }
}

/// 프롬프트 파트 생성/수정 요청 DTO (part_id 기준 upsert)
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PromptPartRequest {
    #[validate(length(min = 1, max = 100, message = "part_id는 1자 이상 100자 이하여야 합니다"))]
    #[schema(example = "local_insights")]
    pub part_id: String,

    #[schema(example = 3)]
    pub position: i32,

    #[serde(default)]
    #[validate(length(max = 200, message = "title은 200자 이하여야 합니다"))]
    #[schema(example = "Local Insights & Tips")]
    pub title: String,

    #[validate(length(min = 1, message = "text는 필수입니다"))]
    #[schema(example = "Write a 'Local's Secrets' section with cultural etiquette and safety tips.")]
    pub text: String,
}

/// 프롬프트 파트 목록 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct PromptListResponse {
    pub prompts: Vec<PromptPart>,
}

/// 프롬프트 파트 삭제 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletePromptResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = 1)]
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_should_require_part_id_and_text() {
        let request: PromptPartRequest = serde_json::from_value(json!({
            "part_id": "",
            "position": 1,
            "text": ""
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("part_id"));
        assert!(fields.contains_key("text"));
    }

    #[test]
    fn request_title_should_default_to_empty() {
        let request: PromptPartRequest = serde_json::from_value(json!({
            "part_id": "extra",
            "position": 9,
            "text": "Keep it short."
        }))
        .unwrap();

        assert!(request.title.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn request_without_position_should_not_deserialize() {
        let result = serde_json::from_value::<PromptPartRequest>(json!({
            "part_id": "extra",
            "text": "Keep it short."
        }));

        assert!(result.is_err());
    }
}
