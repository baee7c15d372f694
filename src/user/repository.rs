use super::{
    models::{User, UserCreateData, UserUpdateData},
    query::{UserPage, UserQuery},
};
use crate::errors::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Sync + Send {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, ApiError>;
    async fn query(&self, query: UserQuery) -> Result<UserPage, ApiError>;
    async fn create(&self, data: UserCreateData) -> Result<User, ApiError>;
    async fn update(&self, id: &str, data: UserUpdateData) -> Result<User, ApiError>;
    /// Returns how many of `ids` were actually removed.
    async fn delete_many(&self, ids: &[String]) -> Result<u64, ApiError>;
}
