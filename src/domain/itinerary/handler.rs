use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use super::dto::{ItineraryRequest, ItineraryResult};
use crate::state::AppState;
use crate::utils::{error::AppError, response::ErrorResponse};

/// 여행 일정 생성
///
/// 저장된 프롬프트 파트에 선호 조건을 채워 AI에 요청하고, 응답을 일정 형태로 검증해 반환합니다.
#[utoipa::path(
    post,
    path = "/api/generate-itinerary",
    tag = "Itinerary",
    request_body = ItineraryRequest,
    responses(
        (status = 200, description = "일정 생성 성공", body = ItineraryResult),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 500, description = "프롬프트 누락 또는 AI 응답 처리 실패", body = ErrorResponse),
        (status = 502, description = "AI 서비스 오류", body = ErrorResponse),
        (status = 503, description = "AI 서비스 일시적 장애", body = ErrorResponse)
    )
)]
pub async fn generate_itinerary(
    State(state): State<AppState>,
    request: Result<Json<ItineraryRequest>, JsonRejection>,
) -> Result<Json<ItineraryResult>, AppError> {
    // JSON 파싱 에러 처리
    let Json(request) = request?;

    tracing::info!(
        days = request.days,
        from = %request.from_location,
        destination = %request.specific_places,
        "Itinerary request received"
    );

    // 입력 검증
    request.validate()?;

    let itinerary = state.itinerary_service.generate(&request).await?;

    Ok(Json(itinerary))
}
