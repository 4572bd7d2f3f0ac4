use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use super::store::{StoreError, User, UserPatch, UserStore};

/// Postgres backend behind the same trait as the file store. Id uniqueness
/// comes from the primary key; the merge update is a read-then-write pair of
/// single statements, keeping the file backend's last-write-wins behavior.
pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: Option<String>,
    role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            // unexpected role values fall back to USER
            role: row.role.parse().unwrap_or_default(),
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e.as_database_error().map(|d| d.kind()),
        Some(sqlx::error::ErrorKind::UniqueViolation)
    )
}

#[async_trait]
impl UserStore for DbStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // an id or email collision surfaces as the same conflict
            if is_unique_violation(&e) {
                StoreError::Duplicate(user.id)
            } else {
                StoreError::Db(e)
            }
        })?;
        debug!(id = row.id, "user row inserted");
        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, StoreError> {
        let current = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        let merged = patch.apply(&current.into());
        sqlx::query(
            r#"
            UPDATE users
            SET id = $1, name = $2, email = $3, role = $4
            WHERE id = $5
            "#,
        )
        .bind(merged.id)
        .bind(&merged.name)
        .bind(&merged.email)
        .bind(merged.role.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;
        debug!(id, "user row updated");
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(id, "user row deleted");
        Ok(())
    }
}
