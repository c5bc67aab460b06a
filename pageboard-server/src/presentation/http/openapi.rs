use utoipa::OpenApi;

use crate::presentation::http::handlers::posts::{
    CreatePostDto, CursorDto, CursorPageDto, DeletedPostDto, GeneratePostsDto, GeneratedPostsDto,
    NumberedPageDto, PostDto, PostsPageDto, UpdatePostDto,
};
use crate::presentation::http::handlers::users::{CreateUserDto, UserDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::generate_posts,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::users::create_user,
        crate::presentation::http::handlers::users::list_users
    ),
    components(
        schemas(
            CreatePostDto,
            UpdatePostDto,
            GeneratePostsDto,
            GeneratedPostsDto,
            DeletedPostDto,
            PostDto,
            CursorDto,
            CursorPageDto,
            NumberedPageDto,
            PostsPageDto,
            CreateUserDto,
            UserDto
        )
    ),
    tags(
        (name = "posts", description = "Posts and pagination"),
        (name = "users", description = "User endpoints")
    )
)]
pub(crate) struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/posts", "/posts/{id}", "/posts/random", "/users"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
