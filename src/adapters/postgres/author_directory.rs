use crate::domain::value_objects::AuthorId;
use crate::ports::author_directory::{AuthorDirectory as AuthorDirectoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of AuthorDirectory
#[derive(Debug, Clone)]
pub struct AuthorDirectory {
    pool: PgPool,
}

impl AuthorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorDirectoryTrait for AuthorDirectory {
    /// Upsert by name in a single statement
    ///
    /// `DO UPDATE` (rather than `DO NOTHING`) makes `RETURNING` yield the
    /// existing row's id when the name is already taken.
    async fn find_or_create_by_name(&self, name: &str) -> Result<AuthorId> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO authors (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name)
            DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(AuthorId::from_uuid(id))
    }
}
