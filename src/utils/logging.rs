//! 로깅 초기화 모듈
//!
//! JSON 형식의 구조화된 로깅을 stdout과 일별 로그 파일에 동시 출력합니다.

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 기본 로그 필터
const DEFAULT_FILTER: &str = "info,wandergenie_server=debug,tower_http=info";

/// 로그 파일명 접두사 (`wandergenie.log.YYYY-MM-DD`)
const LOG_FILE_PREFIX: &str = "wandergenie.log";

/// 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG`로 레벨을 조정할 수 있고, 파일은 `LOG_DIR`(기본 `logs`)에 기록됩니다.
/// 반환되는 `WorkerGuard`를 main에서 유지해야 종료 시 버퍼링된 로그가 유실되지 않습니다.
pub fn init_logging() -> WorkerGuard {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false);

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        // 테스트 등에서 이미 초기화된 경우
        eprintln!("Failed to initialize tracing: {}", err);
    }

    guard
}
