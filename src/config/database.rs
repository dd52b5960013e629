use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::domain::prompt::entity::prompt_part;

/// 데이터베이스 연결 생성
///
/// `sync_schema`가 true이면 `prompt_part` 테이블이 없을 때 생성합니다.
pub async fn establish_connection(
    database_url: &str,
    max_connections: u32,
    sync_schema: bool,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Successfully connected to the database.");

    if sync_schema {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    let mut stmt = schema.create_table_from_entity(prompt_part::Entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await.map_err(|e| {
        tracing::error!("Failed to create table prompt_part: {}", e);
        e
    })?;

    info!("Database schema synchronization completed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn should_create_prompt_table_on_sqlite() {
        let db = establish_connection("sqlite::memory:", 1, true).await.unwrap();

        let count = prompt_part::Entity::find().count(&db).await.unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn schema_sync_should_be_repeatable() {
        let db = establish_connection("sqlite::memory:", 1, true).await.unwrap();

        assert!(create_tables(&db).await.is_ok());
    }
}
