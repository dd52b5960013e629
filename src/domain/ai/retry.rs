use backoff::{future::retry, ExponentialBackoff};
use std::future::Future;
use std::time::Duration;

use crate::utils::error::AppError;

/// 지수 백오프 설정 생성
///
/// 500ms부터 두 배씩 늘리며 최대 10초 간격, 총 30초까지 재시도합니다.
fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(10),
        max_elapsed_time: Some(Duration::from_secs(30)),
        multiplier: 2.0,
        ..Default::default()
    }
}

/// 재시도 로직을 적용한 비동기 작업 실행
///
/// 일시적 오류(타임아웃, 5xx, rate limit)는 지수 백오프로 재시도하고,
/// 그 외 오류는 즉시 실패를 반환합니다.
pub async fn with_retry<F, Fut, T>(operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    with_backoff(create_backoff(), operation).await
}

async fn with_backoff<F, Fut, T>(backoff: ExponentialBackoff, operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let operation = &operation;
    retry(backoff, move || async move {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) if e.is_transient() => {
                tracing::warn!(error = %e, "Retryable error, will retry...");
                Err(backoff::Error::transient(e))
            }
            Err(e) => {
                tracing::error!(error = %e, "Permanent error, not retrying");
                Err(backoff::Error::permanent(e))
            }
        }
    })
    .await
}
