use axum::Router;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, generate_posts, get_post, list_posts, update_post,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/random", post(generate_posts))
        .route("/{id}", get(get_post).patch(update_post).delete(delete_post))
}
