use std::sync::Arc;

use sea_orm::{
    sea_query::OnConflict, DatabaseConnection, EntityTrait, QueryOrder, Set,
};

use super::dto::{PromptPart, PromptPartRequest};
use super::entity::prompt_part;
use super::seed::{default_parts, SEED_VERSION};
use crate::utils::error::AppError;

/// 프롬프트 파트 저장소 인터페이스
///
/// 핸들러와 서비스는 이 트레이트만 의존하므로 저장소 구현을 교체할 수 있습니다.
#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    /// 모든 파트를 position, part_id 오름차순으로 반환
    async fn list(&self) -> Result<Vec<PromptPart>, AppError>;

    /// 단일 파트 조회 (없으면 `PromptNotFound`)
    async fn get(&self, part_id: &str) -> Result<PromptPart, AppError>;

    /// part_id 기준 생성 또는 교체 후 저장된 값 반환
    async fn upsert(&self, part: PromptPartRequest) -> Result<PromptPart, AppError>;

    /// 파트 삭제 (없으면 `PromptNotFound`)
    async fn delete(&self, part_id: &str) -> Result<u64, AppError>;

    /// 기본 파트 세트를 upsert 합니다. 반복 호출해도 결과가 같습니다.
    async fn seed(&self) -> Result<usize, AppError> {
        let parts = default_parts();
        let count = parts.len();
        for part in parts {
            self.upsert(part).await?;
        }
        tracing::info!(count, version = SEED_VERSION, "Seeded default prompt parts");
        Ok(count)
    }
}

/// Arc로 래핑된 저장소 핸들 (Clone 지원)
pub type SharedTemplateStore = Arc<dyn TemplateStore>;

/// sea-orm 기반 저장소 구현체
#[derive(Clone)]
pub struct SeaOrmTemplateStore {
    db: DatabaseConnection,
}

impl SeaOrmTemplateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 종료 시 커넥션 풀 정리
    pub async fn close(self) -> Result<(), AppError> {
        self.db.close().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TemplateStore for SeaOrmTemplateStore {
    async fn list(&self) -> Result<Vec<PromptPart>, AppError> {
        let parts = prompt_part::Entity::find()
            .order_by_asc(prompt_part::Column::Position)
            .order_by_asc(prompt_part::Column::PartId)
            .all(&self.db)
            .await?;

        Ok(parts.into_iter().map(PromptPart::from).collect())
    }

    async fn get(&self, part_id: &str) -> Result<PromptPart, AppError> {
        prompt_part::Entity::find_by_id(part_id.to_owned())
            .one(&self.db)
            .await?
            .map(PromptPart::from)
            .ok_or_else(|| AppError::PromptNotFound(part_id.to_owned()))
    }

    async fn upsert(&self, part: PromptPartRequest) -> Result<PromptPart, AppError> {
        let part_id = part.part_id.clone();
        let model = prompt_part::ActiveModel {
            part_id: Set(part.part_id),
            position: Set(part.position),
            title: Set(part.title),
            text: Set(part.text),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };

        prompt_part::Entity::insert(model)
            .on_conflict(
                OnConflict::column(prompt_part::Column::PartId)
                    .update_columns([
                        prompt_part::Column::Position,
                        prompt_part::Column::Title,
                        prompt_part::Column::Text,
                        prompt_part::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        tracing::debug!(part_id = %part_id, "Prompt part upserted");
        self.get(&part_id).await
    }

    async fn delete(&self, part_id: &str) -> Result<u64, AppError> {
        let result = prompt_part::Entity::delete_by_id(part_id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::PromptNotFound(part_id.to_owned()));
        }

        tracing::debug!(part_id, "Prompt part deleted");
        Ok(result.rows_affected)
    }
}
