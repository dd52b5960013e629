use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::utils::error::AppError;

/// 기본 AI 호출 타임아웃 (초)
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 25;

/// OpenAI 에러를 세분화된 AppError로 변환
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = api_err.message.to_lowercase();

            if (err_type == "invalid_request_error" && message.contains("api key"))
                || err_type == "authentication_error"
            {
                AppError::AiAuthError
            } else if err_type == "rate_limit_error"
                || err_type == "insufficient_quota"
                || message.contains("rate limit")
            {
                AppError::AiRateLimitError
            } else if err_type == "server_error" || message.contains("overloaded") {
                AppError::AiTemporaryError
            } else {
                AppError::AiError(api_err.message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => {
            let status = req_err.status().map(|s| s.as_u16());
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::AiTemporaryError
            } else if status == Some(401) || status == Some(403) {
                AppError::AiAuthError
            } else if status == Some(429) {
                AppError::AiRateLimitError
            } else if status.map(|s| s >= 500).unwrap_or(false) {
                AppError::AiTemporaryError
            } else {
                AppError::AiError(req_err.to_string())
            }
        }
        _ => AppError::AiError(error.to_string()),
    }
}

/// AI 클라이언트 인터페이스
///
/// 생성형 AI 호출을 추상화하여 테스트에서 Mock 객체로 대체할 수 있습니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AiClientTrait: Send + Sync {
    /// 채팅 완성 요청. 빈 응답은 `AiEmptyResponse`로 실패합니다.
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError>;
}

/// Arc로 래핑된 AiClient (Clone 지원)
pub type AiClient = Arc<dyn AiClientTrait>;

/// OpenAI 호환 API 클라이언트 구현체
///
/// `api_base`를 바꾸면 OpenAI 호환 엔드포인트를 제공하는 다른 모델도 사용할 수 있습니다.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: &str, api_base: Option<&str>, model: &str, timeout: Duration) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl AiClientTrait for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| AppError::AiTemporaryError)? // 타임아웃
            .map_err(classify_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AppError::AiEmptyResponse);
        }

        Ok(content)
    }
}

/// 메시지 빌더 헬퍼 함수 (crate 내부용)
pub(crate) fn build_system_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

pub(crate) fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    fn api_error(r#type: &str, message: &str) -> OpenAIError {
        let api_err: ApiError = serde_json::from_value(serde_json::json!({
            "message": message,
            "type": r#type,
            "param": null,
            "code": null
        }))
        .unwrap();
        OpenAIError::ApiError(api_err)
    }

    #[test]
    fn should_create_client_with_custom_base() {
        let client = OpenAiClient::new(
            "test-api-key",
            Some("http://localhost:9999/v1"),
            "test-model",
            Duration::from_secs(1),
        );
        assert_eq!(client.model, "test-model");
    }

    #[test]
    fn should_build_messages() {
        assert!(build_system_message("system").is_ok());
        assert!(build_user_message("user").is_ok());
    }

    #[test]
    fn invalid_api_key_should_be_auth_error() {
        let error = classify_openai_error(api_error(
            "invalid_request_error",
            "Incorrect API key provided",
        ));
        assert!(matches!(error, AppError::AiAuthError));
    }

    #[test]
    fn rate_limit_should_be_classified() {
        let error = classify_openai_error(api_error("rate_limit_error", "slow down"));
        assert!(matches!(error, AppError::AiRateLimitError));
    }

    #[test]
    fn server_error_should_be_temporary() {
        let error = classify_openai_error(api_error("server_error", "oops"));
        assert!(matches!(error, AppError::AiTemporaryError));
    }

    #[test]
    fn other_api_errors_should_keep_message() {
        let error = classify_openai_error(api_error("invalid_request_error", "bad model"));
        assert!(matches!(error, AppError::AiError(msg) if msg == "bad model"));
    }
}
