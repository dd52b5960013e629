use serde::Serialize;
use utoipa::ToSchema;

/// 헬스체크 응답 (프로세스 생존 여부만 확인)
#[derive(Serialize, Debug, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: &'static str,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_should_serialize_as_ok() {
        let json = serde_json::to_value(HealthStatus::ok()).unwrap();

        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}
