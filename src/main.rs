use std::sync::Arc;

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use wandergenie_server::{
    config::{establish_connection, AppConfig},
    create_router,
    domain::{ai::OpenAiClient, prompt::SeaOrmTemplateStore},
    shutdown::shutdown_signal,
    state::AppState,
    utils::logging::init_logging,
    with_request_timeout,
};

#[tokio::main]
async fn main() {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 main 종료 시까지 유지)
    let _guard = init_logging();

    // 3. 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // 4. 데이터베이스 연결
    let db = match establish_connection(
        &config.database_url,
        config.db_max_connections,
        config.db_schema_update,
    )
    .await
    {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };
    let store = SeaOrmTemplateStore::new(db);

    // 5. AI 클라이언트
    let ai_client = OpenAiClient::new(
        &config.ai_api_key,
        config.ai_api_base.as_deref(),
        &config.ai_model,
        config.ai_timeout,
    );

    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(ai_client),
        config.admin_secret_key.clone(),
    );

    // 6. 메트릭 레코더
    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            std::process::exit(1);
        }
    };

    // 7. 라우터 설정
    let app = create_router(state).route(
        "/metrics",
        get(move || std::future::ready(metrics_handle.render())),
    );
    let app = with_request_timeout(app, config.request_timeout);

    // 8. 서버 실행
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %addr, "Failed to bind address");
            std::process::exit(1);
        }
    };

    tracing::info!(
        addr = %addr,
        model = %config.ai_model,
        ai_timeout_secs = config.ai_timeout.as_secs(),
        "Server listening"
    );
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // 9. 종료 정리
    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "Failed to close database connection");
    }
    tracing::info!("Server shutdown complete");
}
