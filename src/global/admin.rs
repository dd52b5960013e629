//! 관리자 키 검증
//!
//! `ADMIN_SECRET_KEY`가 설정된 경우에만 프롬프트 관리 API에 `x-admin-key` 헤더를 요구합니다.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::state::AppState;
use crate::utils::error::AppError;

/// 관리자 키 헤더 이름
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

#[derive(Clone)]
pub struct AdminKeyValidator {
    expected_key: String,
}

impl AdminKeyValidator {
    pub fn new(expected_key: String) -> Self {
        Self { expected_key }
    }

    /// 상수 시간 비교로 관리자 키를 검증합니다.
    pub fn validate(&self, provided_key: &str) -> Result<(), AppError> {
        let expected = self.expected_key.as_bytes();
        let provided = provided_key.as_bytes();

        let length_matches = expected.len() == provided.len();
        let min_len = std::cmp::min(expected.len(), provided.len());
        let content_matches = expected[..min_len].ct_eq(&provided[..min_len]).unwrap_u8() == 1;

        if !length_matches || !content_matches {
            tracing::warn!(
                event = "invalid_admin_key_attempt",
                "Invalid admin key attempt detected"
            );
            return Err(AppError::InvalidAdminKey);
        }

        Ok(())
    }
}

/// 관리자 키 미들웨어
///
/// 키가 설정되지 않았으면 모든 요청을 통과시킵니다.
pub async fn require_admin_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(validator) = &state.admin_key {
        let provided = request
            .headers()
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        validator.validate(provided)?;
    }

    Ok(next.run(request).await)
}
