//! 요청 추적 미들웨어
//!
//! 요청마다 request ID를 부여(또는 전달받은 값을 사용)하고, span 안에서
//! 처리 시간과 상태 코드를 기록합니다.

use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    BoxError,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use tower::timeout::error::Elapsed;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::utils::error::AppError;

/// Request ID 헤더 이름
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 요청 처리 중 남는 로그(에러 응답 포함)는 모두 이 span의 `request_id`를 갖습니다.
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(request).await;
        let duration = start.elapsed();
        let status = response.status();

        info!(
            duration_ms = duration.as_millis() as u64,
            status = status.as_u16(),
            "request completed"
        );
        record_request_metrics(&method, &path, status, duration);

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

/// 타임아웃 레이어 에러를 공통 에러 응답으로 변환합니다.
pub async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::RequestTimeout
    } else {
        AppError::Internal(err.to_string())
    }
}

fn record_request_metrics(method: &str, path: &str, status: StatusCode, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", normalize_path(path)),
        ("status", status.as_u16().to_string()),
    ];

    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// 경로 파라미터(프롬프트 ID 등)로 라벨이 늘어나지 않도록 앞 두 세그먼트만 남깁니다.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 2 {
        path.to_string()
    } else {
        format!("/{}/{}", segments[0], segments[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn elapsed_should_become_request_timeout() {
        let error = handle_timeout_error(Box::new(Elapsed::new())).await;

        assert!(matches!(error, AppError::RequestTimeout));
    }

    #[tokio::test]
    async fn other_layer_errors_should_become_internal() {
        let error = handle_timeout_error("overloaded".into()).await;

        assert!(matches!(error, AppError::Internal(msg) if msg == "overloaded"));
    }

    #[test]
    fn normalize_path_should_keep_short_paths() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/api/prompts"), "/api/prompts");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn normalize_path_should_drop_path_parameters() {
        assert_eq!(normalize_path("/api/prompts/core_itinerary"), "/api/prompts");
        assert_eq!(normalize_path("/api/prompts/seed"), "/api/prompts");
    }
}
