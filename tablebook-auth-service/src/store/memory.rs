use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use super::{UserStore, UserStoreError};
use crate::models::{User, UserCredentials};

/// Users keyed by email.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, (User, UserCredentials)>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> UserStoreError {
        UserStoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(
        &self,
        user: &User,
        credentials: &UserCredentials,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        if users.contains_key(&user.email) {
            return Err(UserStoreError::Duplicate);
        }
        users.insert(user.email.clone(), (user.clone(), credentials.clone()));
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, UserCredentials)>, UserStoreError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn user(email: &str) -> (User, UserCredentials) {
        let id = Uuid::new_v4();
        (
            User {
                id,
                email: email.to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                created_at: Utc::now(),
            },
            UserCredentials {
                user_id: id,
                passphrase_hash: "hash".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        let (jane, credentials) = user("jane@example.com");
        store.insert_user(&jane, &credentials).await.unwrap();

        let (other, credentials) = user("jane@example.com");
        assert!(matches!(
            store.insert_user(&other, &credentials).await,
            Err(UserStoreError::Duplicate)
        ));
        let (found, _) = store.find_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, jane.id);
    }

    #[tokio::test]
    async fn test_poisoned_lock_reports_unavailable() {
        let store = MemoryUserStore::new();
        let users = store.users.clone();
        std::thread::spawn(move || {
            let _guard = users.write().unwrap();
            panic!("writer panicked");
        })
        .join()
        .unwrap_err();

        assert!(matches!(
            store.find_by_email("jane@example.com").await,
            Err(UserStoreError::Unavailable(_))
        ));
        let (jane, credentials) = user("jane@example.com");
        assert!(matches!(
            store.insert_user(&jane, &credentials).await,
            Err(UserStoreError::Unavailable(_))
        ));
    }
}
