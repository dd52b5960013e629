use axum::Json;

use super::dto::HealthStatus;

/// 헬스체크 API
///
/// 외부 의존성(DB, AI)은 확인하지 않는 liveness 체크입니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "헬스체크 성공", body = HealthStatus)
    )
)]
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
