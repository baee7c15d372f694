use super::{
    models::{DeletedUsers, User, UserCreateData, UserUpdateData},
    query::{UserPage, UserQueryParams},
    repository::UserRepository,
};
use crate::{errors::ApiError, http::DataResponse};
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserIdPathParams {
    pub id: String,
}

pub struct UserHandlers<U: UserRepository> {
    user_repo: U,
    max_page_limit: usize,
}

impl<U: UserRepository> UserHandlers<U> {
    pub fn new(user_repo: U, max_page_limit: usize) -> Self {
        Self {
            user_repo,
            max_page_limit,
        }
    }

    pub async fn handle_get_many(
        &self,
        query: UserQueryParams,
    ) -> Result<DataResponse<UserPage>, ApiError> {
        let page = self
            .user_repo
            .query(query.into_query(self.max_page_limit))
            .await?;

        Ok(page.into())
    }

    pub async fn handle_get_one(
        &self,
        path: UserIdPathParams,
    ) -> Result<DataResponse<User>, ApiError> {
        let user = self
            .user_repo
            .get_by_id(&path.id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        Ok(user.into())
    }

    pub async fn handle_create(
        &self,
        body: UserCreateData,
    ) -> Result<DataResponse<User>, ApiError> {
        let user = self.user_repo.create(body).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User created");

        Ok(DataResponse::with_code(user, StatusCode::CREATED))
    }

    pub async fn handle_update(
        &self,
        path: UserIdPathParams,
        body: UserUpdateData,
    ) -> Result<DataResponse<User>, ApiError> {
        let user = self.user_repo.update(&path.id, body).await?;

        tracing::info!(user_id = %user.id, "User updated");

        Ok(user.into())
    }

    /// `pairs` is the raw query string; every `id` key names a user to remove.
    pub async fn handle_delete(
        &self,
        pairs: Vec<(String, String)>,
    ) -> Result<DataResponse<DeletedUsers>, ApiError> {
        let ids: Vec<String> = pairs
            .into_iter()
            .filter(|(k, v)| k == "id" && !v.is_empty())
            .map(|(_, v)| v)
            .collect();

        if ids.is_empty() {
            return Err(ApiError::UserIdsMissing);
        }

        let count = self.user_repo.delete_many(&ids).await?;
        if count == 0 {
            return Err(ApiError::UsersNotMatched);
        }

        tracing::info!(count, requested = ids.len(), "Users deleted");

        Ok(DeletedUsers::new(count).into())
    }
}
