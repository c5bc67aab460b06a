use std::sync::Arc;

use crate::application::posts_service::PostsService;
use crate::application::users_service::UsersService;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;

pub(crate) mod http;

pub(crate) type SharedPostsService = PostsService<Arc<dyn PostRepository>>;
pub(crate) type SharedUsersService = UsersService<Arc<dyn UserRepository>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) posts_service: Arc<SharedPostsService>,
    pub(crate) users_service: Arc<SharedUsersService>,
}

impl AppState {
    pub(crate) fn new(
        posts_service: Arc<SharedPostsService>,
        users_service: Arc<SharedUsersService>,
    ) -> Self {
        Self {
            posts_service,
            users_service,
        }
    }
}
