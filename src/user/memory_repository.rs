use super::{
    models::{User, UserCreateData, UserUpdateData, ValidUserCreateData},
    query::{UserPage, UserQuery},
    repository::UserRepository,
};
use crate::errors::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local user store. The collection keeps insertion order, which is
/// also the order equal sort keys come back in.
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let lock = self.users.lock().await;

        Ok(lock.iter().find(|u| u.id == id).cloned())
    }

    async fn query(&self, query: UserQuery) -> Result<UserPage, ApiError> {
        let lock = self.users.lock().await;

        Ok(query.run(&lock))
    }

    async fn create(&self, data: UserCreateData) -> Result<User, ApiError> {
        let data = ValidUserCreateData::try_from(data)?;

        let mut lock = self.users.lock().await;
        if lock.iter().any(|u| u.email == data.email) {
            return Err(ApiError::UserAlreadyExists);
        }

        let user = User::new(data, Utc::now());
        lock.push(user.clone());
        drop(lock);

        Ok(user)
    }

    async fn update(&self, id: &str, data: UserUpdateData) -> Result<User, ApiError> {
        let mut lock = self.users.lock().await;

        let idx = lock
            .iter()
            .position(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;

        if let Some(email) = &data.email {
            if lock.iter().any(|u| u.id != id && &u.email == email) {
                return Err(ApiError::UserAlreadyExists);
            }
        }

        let user = &mut lock[idx];
        user.apply_update(data, Utc::now());

        Ok(user.clone())
    }

    async fn delete_many(&self, ids: &[String]) -> Result<u64, ApiError> {
        let mut lock = self.users.lock().await;

        let before = lock.len();
        lock.retain(|u| !ids.contains(&u.id));

        Ok((before - lock.len()) as u64)
    }
}
