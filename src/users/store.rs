use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access level attached to every user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User record as the record store persists and returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Partial overlay applied to an existing record. `None` fields keep their
/// stored values; supplied fields overwrite, the id included.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn apply(self, base: &User) -> User {
        User {
            id: self.id.unwrap_or(base.id),
            name: self.name.unwrap_or_else(|| base.name.clone()),
            email: self.email.or_else(|| base.email.clone()),
            role: self.role.unwrap_or(base.role),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read user data: {0}")]
    Io(#[from] std::io::Error),

    #[error("user data is not a valid record array: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("user {0} already exists")]
    Duplicate(i64),

    #[error("no user with id {0}")]
    NotFound(i64),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Strategy interface over the user record backends. The implementation is
/// chosen from configuration at startup and injected through `AppState`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All records, in storage order.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Append a record; `Duplicate` if the id is already taken.
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Shallow-merge `patch` over the record matching `id` and persist the
    /// result.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, StoreError>;

    /// Remove the record matching `id`.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_keeps_unsupplied_fields() {
        let base = User {
            id: 1,
            name: "Ana".into(),
            email: Some("ana@example.com".into()),
            role: Role::User,
        };
        let merged = UserPatch {
            name: Some("Anita".into()),
            ..Default::default()
        }
        .apply(&base);
        assert_eq!(merged.id, 1);
        assert_eq!(merged.name, "Anita");
        assert_eq!(merged.email.as_deref(), Some("ana@example.com"));
        assert_eq!(merged.role, Role::User);
    }

    #[test]
    fn patch_may_overwrite_the_id() {
        let base = User {
            id: 1,
            name: "Ana".into(),
            email: None,
            role: Role::User,
        };
        let merged = UserPatch {
            id: Some(9),
            ..Default::default()
        }
        .apply(&base);
        assert_eq!(merged.id, 9);
        assert_eq!(merged.name, "Ana");
    }

    #[test]
    fn record_without_role_defaults_to_user() {
        let user: User = serde_json::from_str(r#"{"id":1,"name":"Ana"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.email, None);
    }

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert!("root".parse::<Role>().is_err());
    }
}
