mod errors;
mod handlers;
mod http;
mod setup;
mod user;

mod impls {
    pub type UserRepo = crate::user::memory_repository::InMemoryUserRepository;
}

use crate::{
    impls::*,
    setup::{env_param, load_seed_users, JsonPanicHandler},
    user::{handlers::UserHandlers, query::DEFAULT_MAX_PAGE_LIMIT},
};
use axum::{extract::Request, ServiceExt};
use std::{error::Error, net::SocketAddr};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{catch_panic::CatchPanicLayer, normalize_path::NormalizePathLayer};
use tracing_subscriber::EnvFilter;

pub type BoxedError = Box<dyn Error + Send + Sync>;

pub const ENCODING_FAILED_BODY: &[u8] =
    br#"{"message":"Failed to encode the response body","error_code":50000}"#;

async fn body() -> Result<(), BoxedError> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().map_err(|_| crate::setup::VarError::DotenvFileNotFound)?;

    #[cfg(feature = "json-log")]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()?;

    #[cfg(not(feature = "json-log"))]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()?;

    let port = env_param("APP_PORT").unwrap_or(8080_u16);
    let max_page_limit = env_param("APP_MAX_PAGE_LIMIT").unwrap_or(DEFAULT_MAX_PAGE_LIMIT);

    let user_repo = match env_param::<String>("APP_USERS_SEED_FILE") {
        Ok(path) => {
            let users = load_seed_users(&path).await?;
            tracing::info!(path = %path, "Loaded users seed file");

            UserRepo::with_users(users)
        }
        Err(_) => UserRepo::new(),
    };

    tracing::info!(users = user_repo.len().await, "User store ready");

    let user_handlers = UserHandlers::new(user_repo, max_page_limit);

    let app =
        handlers::user_router(user_handlers).layer(CatchPanicLayer::custom(JsonPanicHandler));

    #[cfg(feature = "http-trace")]
    let app = app.layer(tower_http::trace::TraceLayer::new_for_http());

    #[cfg(feature = "http-cors")]
    let app = crate::setup::setup_app_cors(app);

    // Path normalization has to run before routing, so it wraps the router
    // instead of being one of its layers.
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    tracing::info!(port, max_page_limit, "Server listenning");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;
    Ok(())
}

fn main() -> Result<(), BoxedError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(body())
}
