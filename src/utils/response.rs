use serde::Serialize;
use utoipa::ToSchema;

/// 에러 응답 구조체
///
/// 형식:
/// ```json
/// {
///   "isSuccess": false,
///   "code": "PROMPT_001",
///   "message": "프롬프트 파트를 찾을 수 없습니다.",
///   "result": null
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// 성공 여부 (에러 시 항상 false)
    #[schema(example = false)]
    pub is_success: bool,

    /// 에러 코드
    #[schema(example = "COMMON400")]
    pub code: String,

    /// 에러 메시지
    #[schema(example = "잘못된 요청입니다.")]
    pub message: String,

    /// 진단용 부가 정보 (AI 응답 파싱 실패 시 원문 일부)
    #[schema(value_type = Option<Object>)]
    pub result: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// 에러 응답 생성
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }

    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }
}

/// 단순 처리 결과 응답 (`{ ok, message }`)
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = "Seeded prompts (4 parts) successfully.")]
    pub message: String,
}

impl OkResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}
