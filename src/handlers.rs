use crate::{
    errors::ApiError,
    http::{AppData, DataResponse, Json, Query},
    user::{
        handlers::{UserHandlers, UserIdPathParams},
        models::{DeletedUsers, User, UserCreateData, UserUpdateData},
        query::{UserPage, UserQueryParams},
        repository::UserRepository,
    },
};
use axum::{extract::Path, routing, Router};

pub fn user_router<U: UserRepository + 'static>(handlers: UserHandlers<U>) -> Router {
    Router::new()
        .route(
            "/api/users",
            routing::get(get_users::<U>)
                .post(post_users::<U>)
                .delete(delete_users::<U>),
        )
        .route(
            "/api/users/:id",
            routing::get(get_user_id::<U>)
                .put(put_user_id::<U>)
                .patch(put_user_id::<U>),
        )
        .layer(AppData::extension(handlers))
}

pub async fn get_users<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<DataResponse<UserPage>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_get_many(pairs.into_iter().collect::<UserQueryParams>()).await
}

pub async fn post_users<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Json(body): Json<UserCreateData>,
) -> Result<DataResponse<User>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_create(body).await
}

pub async fn delete_users<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<DataResponse<DeletedUsers>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_delete(pairs).await
}

pub async fn get_user_id<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Path(path): Path<UserIdPathParams>,
) -> Result<DataResponse<User>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_get_one(path).await
}

pub async fn put_user_id<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Path(path): Path<UserIdPathParams>,
    Json(body): Json<UserUpdateData>,
) -> Result<DataResponse<User>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_update(path, body).await
}
