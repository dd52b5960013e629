use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use super::dto::{DeletePromptResponse, PromptListResponse, PromptPart, PromptPartRequest};
use crate::state::AppState;
use crate::utils::{error::AppError, response::ErrorResponse, OkResponse};

/// 기본 프롬프트 파트 시드
///
/// 기본 세트를 part_id 기준으로 덮어씁니다. 여러 번 호출해도 결과가 같습니다.
#[utoipa::path(
    post,
    path = "/api/prompts/seed",
    tag = "Prompt",
    responses(
        (status = 200, description = "시드 성공", body = OkResponse),
        (status = 401, description = "관리자 키 불일치", body = ErrorResponse),
        (status = 500, description = "서버 에러", body = ErrorResponse)
    )
)]
pub async fn seed_prompts(State(state): State<AppState>) -> Result<Json<OkResponse>, AppError> {
    let count = state.prompt_store.seed().await?;

    Ok(Json(OkResponse::new(format!(
        "Seeded prompts ({} parts) successfully.",
        count
    ))))
}

/// 프롬프트 파트 목록 조회 (조합 순서대로)
#[utoipa::path(
    get,
    path = "/api/prompts",
    tag = "Prompt",
    responses(
        (status = 200, description = "조회 성공", body = PromptListResponse),
        (status = 401, description = "관리자 키 불일치", body = ErrorResponse),
        (status = 500, description = "서버 에러", body = ErrorResponse)
    )
)]
pub async fn list_prompts(
    State(state): State<AppState>,
) -> Result<Json<PromptListResponse>, AppError> {
    let prompts = state.prompt_store.list().await?;
    tracing::debug!(count = prompts.len(), "Prompt parts listed");

    Ok(Json(PromptListResponse { prompts }))
}

/// 프롬프트 파트 단건 조회
#[utoipa::path(
    get,
    path = "/api/prompts/{part_id}",
    tag = "Prompt",
    params(("part_id" = String, Path, description = "프롬프트 파트 식별자")),
    responses(
        (status = 200, description = "조회 성공", body = PromptPart),
        (status = 404, description = "파트 없음", body = ErrorResponse)
    )
)]
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(part_id): Path<String>,
) -> Result<Json<PromptPart>, AppError> {
    Ok(Json(state.prompt_store.get(&part_id).await?))
}

/// 프롬프트 파트 생성 또는 수정 (part_id 기준)
#[utoipa::path(
    post,
    path = "/api/prompts",
    tag = "Prompt",
    request_body = PromptPartRequest,
    responses(
        (status = 200, description = "저장 성공", body = PromptPart),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "관리자 키 불일치", body = ErrorResponse)
    )
)]
pub async fn upsert_prompt(
    State(state): State<AppState>,
    request: Result<Json<PromptPartRequest>, JsonRejection>,
) -> Result<Json<PromptPart>, AppError> {
    let Json(request) = request?;
    request.validate()?;

    let stored = state.prompt_store.upsert(request).await?;
    tracing::info!(part_id = %stored.part_id, position = stored.position, "Prompt part saved");

    Ok(Json(stored))
}

/// 프롬프트 파트 삭제
#[utoipa::path(
    delete,
    path = "/api/prompts/{part_id}",
    tag = "Prompt",
    params(("part_id" = String, Path, description = "프롬프트 파트 식별자")),
    responses(
        (status = 200, description = "삭제 성공", body = DeletePromptResponse),
        (status = 404, description = "파트 없음", body = ErrorResponse)
    )
)]
pub async fn delete_prompt(
    State(state): State<AppState>,
    Path(part_id): Path<String>,
) -> Result<Json<DeletePromptResponse>, AppError> {
    let deleted_count = state.prompt_store.delete(&part_id).await?;
    tracing::info!(part_id = %part_id, "Prompt part deleted");

    Ok(Json(DeletePromptResponse {
        ok: true,
        deleted_count,
    }))
}
