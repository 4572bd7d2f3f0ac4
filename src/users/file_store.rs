use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::store::{StoreError, User, UserPatch, UserStore};

/// JSON-array file backend. Every mutation loads the whole file and rewrites
/// it, so the last writer's snapshot wins. Mutations are serialized behind a
/// mutex and persisted by writing a sibling temp file and renaming it over
/// the original, so readers never observe a half-written file. There is no
/// cross-process locking.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<User>, StoreError> {
        let raw = tokio::fs::read(&self.path).await?;
        let users = serde_json::from_slice(&raw)?;
        Ok(users)
    }

    async fn persist(&self, users: &[User]) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.load().await
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Duplicate(user.id));
        }
        users.push(user.clone());
        self.persist(&users).await?;
        debug!(id = user.id, "user record created");
        Ok(user)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let merged = patch.apply(slot);
        *slot = merged.clone();
        self.persist(&users).await?;
        debug!(id, "user record updated");
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.persist(&users).await?;
        debug!(id, "user record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::store::Role;

    fn seeded_store(contents: &str) -> FileStore {
        let path = std::env::temp_dir().join(format!("users-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).expect("seed users file");
        FileStore::new(path)
    }

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.into(),
            email: None,
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn create_persists_exactly_the_submitted_record() {
        let store = seeded_store("[]");
        let created = store
            .create(User {
                id: 1,
                name: "Ana".into(),
                email: Some("ana@example.com".into()),
                role: Role::User,
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Ana");

        let users = store.list().await.unwrap();
        assert_eq!(users, vec![created]);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected_and_the_set_is_unchanged() {
        let store = seeded_store("[]");
        store.create(user(1, "Ana")).await.unwrap();

        let err = store.create(user(1, "Beto")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(1)));

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ana");
    }

    #[tokio::test]
    async fn update_merges_only_the_supplied_fields() {
        let store = seeded_store("[]");
        store
            .create(User {
                id: 2,
                name: "Carla".into(),
                email: Some("carla@example.com".into()),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let merged = store
            .update(
                2,
                UserPatch {
                    name: Some("Carlota".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(merged.name, "Carlota");
        assert_eq!(merged.email.as_deref(), Some("carla@example.com"));
        assert_eq!(merged.role, Role::Admin);

        let users = store.list().await.unwrap();
        assert_eq!(users[0], merged);
    }

    #[tokio::test]
    async fn update_lets_a_patch_change_the_id() {
        let store = seeded_store("[]");
        store.create(user(3, "Dario")).await.unwrap();

        let merged = store
            .update(
                3,
                UserPatch {
                    id: Some(30),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(merged.id, 30);

        let users = store.list().await.unwrap();
        assert_eq!(users[0].id, 30);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = seeded_store("[]");
        let err = store.update(99, UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let store = seeded_store("[]");
        store.create(user(1, "Ana")).await.unwrap();
        store.create(user(2, "Beto")).await.unwrap();

        store.delete(1).await.unwrap();
        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 2);
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_the_set_untouched() {
        let store = seeded_store("[]");
        store.create(user(1, "Ana")).await.unwrap();

        let err = store.delete(99).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_reads_as_an_io_error() {
        let path = std::env::temp_dir().join(format!("users-{}.json", uuid::Uuid::new_v4()));
        let store = FileStore::new(path);
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn garbage_contents_read_as_a_parse_error() {
        let store = seeded_store("not json at all");
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[tokio::test]
    async fn legacy_records_without_role_still_parse() {
        let store = seeded_store(r#"[{"id":1,"name":"Ana"}]"#);
        let users = store.list().await.unwrap();
        assert_eq!(users[0].role, Role::User);
    }
}
