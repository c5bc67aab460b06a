use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;
#[cfg(test)]
mod test_support;

use application::pagination::CursorPageAssembler;
use application::posts_service::PostsService;
use application::users_service::UsersService;
use data::post_repository::PostRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use data::user_repository::UserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let posts_url = settings.posts_url()?;
    info!(%posts_url, "next links base");

    let post_repo: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(pool.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool));

    let posts_service = Arc::new(PostsService::new(
        post_repo,
        CursorPageAssembler::new(posts_url),
    ));
    let users_service = Arc::new(UsersService::new(user_repo));
    let state = AppState::new(posts_service, users_service);

    server::run_http(&settings, state).await
}
