use std::env;
use std::time::Duration;

use crate::domain::ai::client::DEFAULT_AI_TIMEOUT_SECS;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub request_timeout: Duration,

    // AI Service
    pub ai_api_key: String,
    pub ai_api_base: Option<String>,
    pub ai_model: String,
    pub ai_timeout: Duration,

    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_schema_update: bool,

    /// 설정 시 `/api/prompts*` 요청에 `x-admin-key` 헤더를 요구합니다.
    pub admin_secret_key: Option<String>,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 로드 (테스트에서 환경 변수 대신 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_host = get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = parse_or(get("SERVER_PORT"), 8000, ConfigError::InvalidPort)?;
        let request_timeout_secs = parse_or(
            get("REQUEST_TIMEOUT_SECS"),
            60,
            ConfigError::InvalidNumber("REQUEST_TIMEOUT_SECS"),
        )?;

        let ai_api_key = get("AI_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .or_else(|| get("OPENAI_API_KEY"))
            .ok_or(ConfigError::MissingVar("AI_API_KEY"))?;
        let ai_api_base = get("AI_API_BASE");
        let ai_model = get("AI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let ai_timeout_secs = parse_or(
            get("AI_TIMEOUT_SECS"),
            DEFAULT_AI_TIMEOUT_SECS,
            ConfigError::InvalidNumber("AI_TIMEOUT_SECS"),
        )?;

        let base_url = get("DATABASE_URL")
            .or_else(|| get("MONGO_URI"))
            .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;
        let database_url = with_database_name(&base_url, get("DB_NAME").as_deref());
        let db_max_connections = parse_or(
            get("DB_MAX_CONNECTIONS"),
            10,
            ConfigError::InvalidNumber("DB_MAX_CONNECTIONS"),
        )?;

        let db_schema_update = get("DB_SCHEMA_UPDATE")
            .map(|v| {
                v.parse::<bool>().unwrap_or_else(|_| {
                    tracing::warn!(
                        "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
                    );
                    false
                })
            })
            .unwrap_or(false);

        let admin_secret_key = get("ADMIN_SECRET_KEY");
        if admin_secret_key.is_none() {
            tracing::warn!(
                "ADMIN_SECRET_KEY 환경변수가 설정되지 않았습니다. 프롬프트 관리 API가 인증 없이 열려 있습니다."
            );
        }

        Ok(Self {
            server_host,
            server_port,
            request_timeout: Duration::from_secs(request_timeout_secs),
            ai_api_key,
            ai_api_base,
            ai_model,
            ai_timeout: Duration::from_secs(ai_timeout_secs),
            database_url,
            db_max_connections,
            db_schema_update,
            admin_secret_key,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    default: T,
    error: ConfigError,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| error),
        None => Ok(default),
    }
}

/// `DB_NAME`이 주어지면 URL 경로의 데이터베이스 이름으로 사용합니다.
///
/// 기존 경로는 교체하고 `?` 뒤 쿼리 옵션은 유지합니다. `scheme://` 형태가 아닌 URL은 그대로 둡니다.
fn with_database_name(base_url: &str, db_name: Option<&str>) -> String {
    let Some(name) = db_name else {
        return base_url.to_string();
    };
    let Some(scheme_end) = base_url.find("://") else {
        tracing::warn!("DB_NAME is ignored for database URLs without an authority");
        return base_url.to_string();
    };

    let (location, query) = match base_url.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (base_url, None),
    };
    let authority_start = scheme_end + 3;
    let authority_end = location[authority_start..]
        .find('/')
        .map_or(location.len(), |i| authority_start + i);

    let mut url = format!("{}/{}", &location[..authority_end], name);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid numeric value for {0}")]
    InvalidNumber(&'static str),
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_load_defaults_with_required_vars() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AI_API_KEY", "key"),
            ("DATABASE_URL", "mysql://localhost:3306/wandergenie"),
        ]))
        .unwrap();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.ai_model, "gpt-4o-mini");
        assert_eq!(config.ai_timeout, Duration::from_secs(25));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.db_max_connections, 10);
        assert!(!config.db_schema_update);
        assert!(config.ai_api_base.is_none());
        assert!(config.admin_secret_key.is_none());
    }

    #[test]
    fn should_fail_without_ai_api_key() {
        let result = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:")]));

        assert!(matches!(result, Err(ConfigError::MissingVar("AI_API_KEY"))));
    }

    #[test]
    fn should_fail_without_database_url() {
        let result = AppConfig::from_lookup(lookup(&[("AI_API_KEY", "key")]));

        assert!(matches!(result, Err(ConfigError::MissingVar("DATABASE_URL"))));
    }

    #[test]
    fn should_fall_back_to_legacy_variable_names() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "gemini"),
            ("MONGO_URI", "mysql://db:3306"),
        ]))
        .unwrap();

        assert_eq!(config.ai_api_key, "gemini");
        assert_eq!(config.database_url, "mysql://db:3306");
    }

    #[test]
    fn should_append_database_name() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AI_API_KEY", "key"),
            ("DATABASE_URL", "mysql://db:3306/"),
            ("DB_NAME", "travel"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "mysql://db:3306/travel");
    }

    #[test]
    fn database_name_should_replace_existing_path() {
        assert_eq!(
            with_database_name("mysql://db:3306/wandergenie", Some("travel")),
            "mysql://db:3306/travel"
        );
        assert_eq!(
            with_database_name("mysql://user:pw@db:3306", Some("travel")),
            "mysql://user:pw@db:3306/travel"
        );
    }

    #[test]
    fn database_name_should_keep_query_options() {
        assert_eq!(
            with_database_name("mysql://db:3306/?ssl-mode=REQUIRED", Some("travel")),
            "mysql://db:3306/travel?ssl-mode=REQUIRED"
        );
        assert_eq!(
            with_database_name("mysql://db:3306/old?ssl-mode=REQUIRED&x=1", Some("travel")),
            "mysql://db:3306/travel?ssl-mode=REQUIRED&x=1"
        );
    }

    #[test]
    fn database_name_should_leave_url_without_authority_unchanged() {
        assert_eq!(
            with_database_name("sqlite::memory:", Some("travel")),
            "sqlite::memory:"
        );
        assert_eq!(with_database_name("mysql://db:3306/app", None), "mysql://db:3306/app");
    }

    #[test]
    fn should_reject_invalid_port() {
        let result = AppConfig::from_lookup(lookup(&[
            ("AI_API_KEY", "key"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "eighty"),
        ]));

        assert!(matches!(result, Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn should_treat_blank_values_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AI_API_KEY", "key"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("ADMIN_SECRET_KEY", "  "),
            ("DB_SCHEMA_UPDATE", "true"),
        ]))
        .unwrap();

        assert!(config.admin_secret_key.is_none());
        assert!(config.db_schema_update);
    }
}
