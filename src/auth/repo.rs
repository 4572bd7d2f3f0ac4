use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// User row as stored in the database. The password hash never leaves the
/// server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
}

impl DbUser {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password and the default role.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, 'USER')
            RETURNING id, name, email, password_hash, role
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
