use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::{error, warn};
use validator::ValidationErrors;

use super::response::ErrorResponse;

/// 애플리케이션 전역 에러 타입
///
/// `Display`는 로그용 상세 메시지이고, 클라이언트에는 `client_message()`만 노출합니다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 입력값 검증 실패 (days < 1 등)
    #[error("입력값 검증 실패: {0}")]
    ValidationError(String),

    #[error("잘못된 요청 형식입니다: {0}")]
    JsonParseFailed(String),

    #[error("유효하지 않은 관리자 키입니다.")]
    InvalidAdminKey,

    #[error("프롬프트 파트를 찾을 수 없습니다: {0}")]
    PromptNotFound(String),

    /// 생성에 필요한 프롬프트 파트가 하나도 없음
    #[error("저장된 프롬프트 파트가 없습니다.")]
    PromptsNotSeeded,

    #[error("AI 서비스 인증 실패")]
    AiAuthError,

    #[error("AI 서비스 요청 한도 초과")]
    AiRateLimitError,

    /// 타임아웃, 연결 실패, 5xx 등 일시적 오류
    #[error("AI 서비스 일시적 오류")]
    AiTemporaryError,

    #[error("AI 서비스 오류: {0}")]
    AiError(String),

    #[error("AI 서비스가 빈 응답을 반환했습니다.")]
    AiEmptyResponse,

    /// AI 응답에서 JSON을 복구하지 못함
    #[error("AI 응답 파싱 실패: {reason}")]
    AiResponseParseFailed { reason: String, raw_excerpt: String },

    /// JSON은 찾았지만 일정 형식에 맞지 않음
    #[error("AI 응답 검증 실패: {reason}")]
    ItineraryValidationFailed { reason: String, raw_excerpt: String },

    #[error("데이터베이스 에러: {0}")]
    DatabaseError(String),

    #[error("내부 에러: {0}")]
    Internal(String),

    /// 요청 처리 시간이 `REQUEST_TIMEOUT_SECS`를 넘김
    #[error("요청 처리 시간 초과")]
    RequestTimeout,
}

impl AppError {
    /// 클라이언트에 노출할 메시지 반환
    pub fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::JsonParseFailed(msg) => format!("잘못된 요청 형식입니다: {}", msg),
            AppError::InvalidAdminKey => "유효하지 않은 관리자 키입니다.".to_string(),
            AppError::PromptNotFound(id) => format!("프롬프트 파트를 찾을 수 없습니다: {}", id),
            AppError::PromptsNotSeeded => {
                "프롬프트 파트가 없습니다. /api/prompts/seed 로 먼저 등록해주세요.".to_string()
            }
            AppError::AiAuthError
            | AppError::AiError(_)
            | AppError::AiEmptyResponse => {
                "AI 서비스와 통신하지 못했습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            AppError::AiRateLimitError | AppError::AiTemporaryError => {
                "AI 서비스가 일시적으로 응답하지 않습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            AppError::AiResponseParseFailed { .. } | AppError::ItineraryValidationFailed { .. } => {
                "AI 응답을 처리하지 못했습니다. 다른 조건으로 다시 시도해주세요.".to_string()
            }
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                "서버 에러, 관리자에게 문의 바랍니다.".to_string()
            }
            AppError::RequestTimeout => {
                "요청 처리 시간이 초과되었습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
        }
    }

    /// 에러 코드 반환
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) => "COMMON400",
            AppError::InvalidAdminKey => "COMMON401",
            AppError::PromptNotFound(_) => "PROMPT_001",
            AppError::PromptsNotSeeded => "PROMPT_002",
            AppError::AiAuthError => "AI_001",
            AppError::AiRateLimitError => "AI_002",
            AppError::AiTemporaryError => "AI_003",
            AppError::AiError(_) => "AI_004",
            AppError::AiEmptyResponse => "AI_005",
            AppError::AiResponseParseFailed { .. } => "ITINERARY_001",
            AppError::ItineraryValidationFailed { .. } => "ITINERARY_002",
            AppError::DatabaseError(_) | AppError::Internal(_) => "COMMON500",
            AppError::RequestTimeout => "COMMON408",
        }
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidAdminKey => StatusCode::UNAUTHORIZED,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PromptNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AiRateLimitError | AppError::AiTemporaryError => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::AiError(_) | AppError::AiEmptyResponse => StatusCode::BAD_GATEWAY,
            AppError::PromptsNotSeeded
            | AppError::AiAuthError
            | AppError::AiResponseParseFailed { .. }
            | AppError::ItineraryValidationFailed { .. }
            | AppError::DatabaseError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 일시적 오류 여부 (재시도 대상)
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::AiTemporaryError | AppError::AiRateLimitError)
    }

    fn raw_excerpt(&self) -> Option<&str> {
        match self {
            AppError::AiResponseParseFailed { raw_excerpt, .. }
            | AppError::ItineraryValidationFailed { raw_excerpt, .. } => Some(raw_excerpt),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            error!(code, error = %self, "Request failed");
        } else {
            warn!(code, error = %self, "Request rejected");
        }

        let mut body = ErrorResponse::new(code, self.client_message());
        if let Some(excerpt) = self.raw_excerpt() {
            body = body.with_result(json!({ "rawExcerpt": excerpt }));
        }

        (status, Json(body)).into_response()
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_should_map_to_400() {
        let error = AppError::ValidationError("days".to_string());

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.error_code(), "COMMON400");
    }

    #[test]
    fn prompt_not_found_should_map_to_404() {
        let error = AppError::PromptNotFound("missing".to_string());

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_code(), "PROMPT_001");
        assert!(error.client_message().contains("missing"));
    }

    #[test]
    fn prompts_not_seeded_should_be_server_error() {
        assert!(AppError::PromptsNotSeeded.status_code().is_server_error());
    }

    #[test]
    fn generation_failures_should_be_server_errors() {
        let errors = [
            AppError::AiAuthError,
            AppError::AiRateLimitError,
            AppError::AiTemporaryError,
            AppError::AiError("boom".to_string()),
            AppError::AiEmptyResponse,
        ];

        for error in errors {
            assert!(error.status_code().is_server_error(), "{error:?}");
        }
    }

    #[test]
    fn only_temporary_and_rate_limit_should_be_transient() {
        assert!(AppError::AiTemporaryError.is_transient());
        assert!(AppError::AiRateLimitError.is_transient());
        assert!(!AppError::AiAuthError.is_transient());
        assert!(!AppError::AiError("bad request".to_string()).is_transient());
        assert!(!AppError::ValidationError("x".to_string()).is_transient());
    }

    #[test]
    fn internal_details_should_not_leak_to_client() {
        let error = AppError::DatabaseError("password=hunter2".to_string());

        assert!(!error.client_message().contains("hunter2"));
        assert!(error.to_string().contains("hunter2"));
    }

    #[test]
    fn parse_failure_should_expose_raw_excerpt() {
        let error = AppError::AiResponseParseFailed {
            reason: "no json".to_string(),
            raw_excerpt: "Sorry, I cannot help with that.".to_string(),
        };

        assert_eq!(error.error_code(), "ITINERARY_001");
        assert_eq!(error.raw_excerpt(), Some("Sorry, I cannot help with that."));
    }

    #[test]
    fn request_timeout_should_map_to_408() {
        let error = AppError::RequestTimeout;

        assert_eq!(error.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(error.error_code(), "COMMON408");
        assert!(!error.is_transient());
    }
}
