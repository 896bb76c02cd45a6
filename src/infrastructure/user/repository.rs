//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserChanges, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    rows: BTreeMap<UserId, User>,
    last_id: u32,
}

impl UserTable {
    fn check_unique(
        &self,
        nickname: Option<&str>,
        email: Option<&str>,
        exclude: Option<UserId>,
    ) -> Result<(), DomainError> {
        for user in self.rows.values() {
            if Some(user.id()) == exclude {
                continue;
            }
            if nickname == Some(user.nickname()) {
                return Err(DomainError::conflict(format!(
                    "Nickname '{}' already taken",
                    user.nickname()
                )));
            }
            if email == Some(user.email()) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' already taken",
                    user.email()
                )));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of UserRepository
///
/// IDs are assigned sequentially starting at 1 and ordering follows
/// insertion.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        table.check_unique(Some(&user.nickname), Some(&user.email), None)?;

        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| DomainError::storage("User ID space exhausted"))?;
        let id = UserId::new(next).map_err(|e| DomainError::storage(e.to_string()))?;

        let stored = User::restore(
            id,
            user.nickname,
            user.email,
            user.password_hash,
            user.created_at,
            user.updated_at,
        );

        table.last_id = next;
        table.rows.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().take(limit).cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email() == email).cloned())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Ok(0);
        }

        table.check_unique(changes.nickname.as_deref(), changes.email.as_deref(), Some(id))?;

        if let Some(user) = table.rows.get_mut(&id) {
            user.apply(&changes);
        }

        Ok(1)
    }

    async fn delete(&self, id: UserId) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_user(nickname: &str, email: &str) -> NewUser {
        let now = Utc::now();
        NewUser {
            nickname: nickname.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn changes() -> UserChanges {
        UserChanges {
            nickname: None,
            email: None,
            password_hash: None,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let alice = repo.insert(new_user("alice", "a@x.com")).await.unwrap();
        let bob = repo.insert(new_user("bob", "b@x.com")).await.unwrap();

        assert_eq!(alice.id().value(), 1);
        assert_eq!(bob.id().value(), 2);
    }

    #[tokio::test]
    async fn test_insert_duplicate_nickname_or_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("alice", "a@x.com")).await.unwrap();

        let err = repo.insert(new_user("alice", "other@x.com")).await.unwrap_err();
        assert!(err.is_conflict());

        let err = repo.insert(new_user("other", "a@x.com")).await.unwrap_err();
        assert!(err.is_conflict());

        assert_eq!(repo.find_all(100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_respects_limit_and_order() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.insert(new_user(&format!("user{}", i), &format!("u{}@x.com", i)))
                .await
                .unwrap();
        }

        let users = repo.find_all(3).await.unwrap();
        let nicknames: Vec<&str> = users.iter().map(|u| u.nickname()).collect();
        assert_eq!(nicknames, vec!["user0", "user1", "user2"]);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("alice", "a@x.com")).await.unwrap();

        assert!(repo.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_zero() {
        let repo = InMemoryUserRepository::new();
        let id = UserId::new(9).unwrap();

        assert_eq!(repo.update(id, changes()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_conflict_excludes_self() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.insert(new_user("alice", "a@x.com")).await.unwrap();
        repo.insert(new_user("bob", "b@x.com")).await.unwrap();

        let mut same = changes();
        same.nickname = Some("alice".to_string());
        assert_eq!(repo.update(alice.id(), same).await.unwrap(), 1);

        let mut taken = changes();
        taken.email = Some("b@x.com".to_string());
        assert!(repo.update(alice.id(), taken).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.insert(new_user("alice", "a@x.com")).await.unwrap();

        assert_eq!(repo.delete(alice.id()).await.unwrap(), 1);
        assert_eq!(repo.delete(alice.id()).await.unwrap(), 0);
        assert!(repo.find_by_id(alice.id()).await.unwrap().is_none());
    }
}
