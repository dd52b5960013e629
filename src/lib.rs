pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::health::handler::health_check,
        domain::itinerary::handler::generate_itinerary,
        domain::prompt::handler::seed_prompts,
        domain::prompt::handler::list_prompts,
        domain::prompt::handler::get_prompt,
        domain::prompt::handler::upsert_prompt,
        domain::prompt::handler::delete_prompt,
    ),
    components(
        schemas(
            domain::health::dto::HealthStatus,
            domain::itinerary::dto::ItineraryRequest,
            domain::itinerary::dto::ItineraryResult,
            domain::itinerary::dto::DayPlan,
            domain::itinerary::dto::Activity,
            domain::prompt::dto::PromptPart,
            domain::prompt::dto::PromptPartRequest,
            domain::prompt::dto::PromptListResponse,
            domain::prompt::dto::DeletePromptResponse,
            utils::response::ErrorResponse,
            utils::response::OkResponse,
        )
    ),
    tags(
        (name = "Health", description = "헬스체크 API"),
        (name = "Itinerary", description = "여행 일정 생성 API"),
        (name = "Prompt", description = "프롬프트 파트 관리 API")
    )
)]
pub struct ApiDoc;

/// 애플리케이션 라우터 생성
///
/// 메트릭 엔드포인트와 타임아웃은 바이너리에서 추가합니다.
pub fn create_router(state: AppState) -> Router {
    let prompt_routes = Router::new()
        .route(
            "/api/prompts",
            get(domain::prompt::handler::list_prompts).post(domain::prompt::handler::upsert_prompt),
        )
        .route("/api/prompts/seed", post(domain::prompt::handler::seed_prompts))
        .route(
            "/api/prompts/:part_id",
            get(domain::prompt::handler::get_prompt).delete(domain::prompt::handler::delete_prompt),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            global::require_admin_key,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(domain::health::health_check))
        .route(
            "/api/generate-itinerary",
            post(domain::itinerary::handler::generate_itinerary),
        )
        .merge(prompt_routes)
        .layer(middleware::from_fn(global::request_tracing))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 요청 타임아웃 적용
///
/// 시간 초과 시 진행 중인 핸들러(AI 호출 포함)를 중단하고 `COMMON408` 에러 응답을 반환합니다.
pub fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(global::handle_timeout_error))
            .timeout(timeout),
    )
}
