use super::{
    assembler::assemble,
    dto::{ItineraryRequest, ItineraryResult},
    extractor::{excerpt, extract_itinerary},
    prompt::{final_prompt, ITINERARY_SYSTEM_PROMPT},
};
use crate::domain::ai::{
    client::{build_system_message, build_user_message},
    retry::with_retry,
    AiClient,
};
use crate::domain::prompt::SharedTemplateStore;
use crate::utils::error::AppError;

/// 로그에 남길 프롬프트 최대 길이
const PROMPT_LOG_LIMIT: usize = 800;

/// 여행 일정 생성 서비스
///
/// 프롬프트 조합 → AI 호출 → 응답 추출을 한 요청 안에서 순서대로 수행합니다.
#[derive(Clone)]
pub struct ItineraryService {
    prompt_store: SharedTemplateStore,
    ai_client: AiClient,
}

impl ItineraryService {
    pub fn new(prompt_store: SharedTemplateStore, ai_client: AiClient) -> Self {
        Self {
            prompt_store,
            ai_client,
        }
    }

    /// 사용자 선호 조건으로 여행 일정을 생성합니다.
    pub async fn generate(&self, request: &ItineraryRequest) -> Result<ItineraryResult, AppError> {
        let expected_days = u32::try_from(request.days)
            .map_err(|_| AppError::ValidationError("days는 1 이상이어야 합니다".to_string()))?;

        let parts = self.prompt_store.list().await?;
        let assembled = assemble(&parts, request)?;
        let prompt = final_prompt(&assembled);

        tracing::debug!(
            parts = parts.len(),
            prompt = %truncate(&prompt, PROMPT_LOG_LIMIT),
            "Prompt assembled"
        );

        let messages = vec![
            build_system_message(ITINERARY_SYSTEM_PROMPT)?,
            build_user_message(&prompt)?,
        ];

        let raw = with_retry(|| self.ai_client.complete(messages.clone())).await?;
        tracing::debug!(
            reply_length = raw.len(),
            reply = %excerpt(&raw),
            "AI reply received"
        );

        let itinerary = extract_itinerary(&raw, expected_days)?;
        tracing::info!(
            days = itinerary.days.len(),
            activities = itinerary.days.iter().map(|d| d.activities.len()).sum::<usize>(),
            "Itinerary generated"
        );

        Ok(itinerary)
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars()
        .take(limit)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::establish_connection;
    use crate::domain::ai::client::MockAiClientTrait;
    use crate::domain::prompt::{SeaOrmTemplateStore, TemplateStore};
    use async_openai::types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageContent,
    };
    use serde_json::json;
    use std::sync::Arc;

    async fn seeded_store() -> SharedTemplateStore {
        let db = establish_connection("sqlite::memory:", 1, true).await.unwrap();
        let store = SeaOrmTemplateStore::new(db);
        store.seed().await.unwrap();
        Arc::new(store)
    }

    async fn empty_store() -> SharedTemplateStore {
        let db = establish_connection("sqlite::memory:", 1, true).await.unwrap();
        Arc::new(SeaOrmTemplateStore::new(db))
    }

    fn three_day_reply() -> String {
        let days: Vec<_> = (1..=3)
            .map(|day| {
                json!({
                    "day": day,
                    "title": format!("Day {day} in Rome"),
                    "activities": [
                        { "time": "09:00", "title": "Colosseum", "cost_estimate": "EUR 18" },
                        { "time": "13:00", "title": "Trattoria lunch", "location": "Trastevere, Rome" }
                    ]
                })
            })
            .collect();
        format!("Here you go!\n```json\n{}\n```", json!({ "days": days }))
    }

    fn rome_request() -> ItineraryRequest {
        serde_json::from_value(json!({
            "days": 3,
            "destination": "Rome",
            "budget": "Mid-range"
        }))
        .unwrap()
    }

    fn user_text(messages: &[ChatCompletionRequestMessage]) -> Option<String> {
        messages.iter().find_map(|m| match m {
            ChatCompletionRequestMessage::User(user) => match &user.content {
                ChatCompletionRequestUserMessageContent::Text(text) => Some(text.clone()),
                _ => None,
            },
            _ => None,
        })
    }

    #[tokio::test]
    async fn should_generate_three_day_itinerary_end_to_end() {
        let mut mock = MockAiClientTrait::new();
        let reply = three_day_reply();
        mock.expect_complete()
            .withf(|messages| {
                user_text(messages)
                    .map(|text| {
                        text.contains("3-day")
                            && text.contains("Rome")
                            && text.contains("Mid-range")
                            && text.contains("\"days\"")
                    })
                    .unwrap_or(false)
            })
            .times(1)
            .returning(move |_| Ok(reply.clone()));

        let service = ItineraryService::new(seeded_store().await, Arc::new(mock));

        let itinerary = service.generate(&rome_request()).await.unwrap();

        assert_eq!(itinerary.days.len(), 3);
        for (i, day) in itinerary.days.iter().enumerate() {
            assert_eq!(day.day as usize, i + 1);
            assert!(day
                .activities
                .iter()
                .all(|activity| !activity.map_link.is_empty()));
        }
    }

    #[tokio::test]
    async fn should_fail_when_no_prompt_parts_exist() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete().times(0);

        let service = ItineraryService::new(empty_store().await, Arc::new(mock));

        let result = service.generate(&rome_request()).await;

        assert!(matches!(result, Err(AppError::PromptsNotSeeded)));
    }

    #[tokio::test]
    async fn should_propagate_generation_failure_without_retry_for_permanent_errors() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(AppError::AiAuthError));

        let service = ItineraryService::new(seeded_store().await, Arc::new(mock));

        let result = service.generate(&rome_request()).await;

        assert!(matches!(result, Err(AppError::AiAuthError)));
    }

    #[tokio::test]
    async fn should_retry_transient_generation_failure() {
        let mut mock = MockAiClientTrait::new();
        let reply = three_day_reply();
        let mut seq = mockall::Sequence::new();
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::AiTemporaryError));
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(reply.clone()));

        let service = ItineraryService::new(seeded_store().await, Arc::new(mock));

        let itinerary = service.generate(&rome_request()).await.unwrap();

        assert_eq!(itinerary.days.len(), 3);
    }

    #[tokio::test]
    async fn should_fail_with_parse_failure_on_refusal() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .returning(|_| Ok("Sorry, I cannot help with that.".to_string()));

        let service = ItineraryService::new(seeded_store().await, Arc::new(mock));

        let result = service.generate(&rome_request()).await;

        assert!(matches!(result, Err(AppError::AiResponseParseFailed { .. })));
    }

    #[tokio::test]
    async fn should_fail_validation_when_day_count_differs() {
        let mut mock = MockAiClientTrait::new();
        let reply = three_day_reply();
        mock.expect_complete().returning(move |_| Ok(reply.clone()));

        let service = ItineraryService::new(seeded_store().await, Arc::new(mock));
        let mut request = rome_request();
        request.days = 4;

        let result = service.generate(&request).await;

        assert!(matches!(result, Err(AppError::ItineraryValidationFailed { .. })));
    }

    #[test]
    fn truncate_should_flatten_newlines() {
        assert_eq!(truncate("a\nb\nc", 3), "a b");
    }
}
