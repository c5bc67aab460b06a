use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::pagination::{CursorPage, NumberedPage, PaginatePostsQuery, PostsPage};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, AppResult};

/// Largest `take` accepted on `GET /posts`.
pub(crate) const MAX_TAKE: u32 = 100;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    pub(crate) author_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    pub(crate) image: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(max = 255))]
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct GeneratePostsDto {
    pub(crate) author_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct GeneratedPostsDto {
    pub(crate) created: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeletedPostDto {
    pub(crate) id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    /// Public path such as `/public/posts/cat.jpg`.
    pub(crate) image: Option<String>,
    pub(crate) like_count: i32,
    pub(crate) comment_count: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CursorDto {
    pub(crate) after: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CursorPageDto {
    pub(crate) data: Vec<PostDto>,
    pub(crate) cursor: CursorDto,
    pub(crate) count: usize,
    pub(crate) next: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct NumberedPageDto {
    pub(crate) data: Vec<PostDto>,
    pub(crate) total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum PostsPageDto {
    Cursor(CursorPageDto),
    Numbered(NumberedPageDto),
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        let image = post.public_image_path();
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            image,
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<CursorPage> for CursorPageDto {
    fn from(page: CursorPage) -> Self {
        Self {
            data: page.data.into_iter().map(PostDto::from).collect(),
            cursor: CursorDto {
                after: page.cursor.after,
            },
            count: page.count,
            next: page.next,
        }
    }
}

impl From<NumberedPage> for NumberedPageDto {
    fn from(page: NumberedPage) -> Self {
        Self {
            data: page.data.into_iter().map(PostDto::from).collect(),
            total: page.total,
        }
    }
}

impl From<PostsPage> for PostsPageDto {
    fn from(page: PostsPage) -> Self {
        match page {
            PostsPage::Cursor(page) => PostsPageDto::Cursor(page.into()),
            PostsPage::Numbered(page) => PostsPageDto::Numbered(page.into()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    params(
        ("take" = Option<u32>, Query, description = "Page size (default 20, max 100)"),
        ("page" = Option<u32>, Query, description = "Page number; switches to page-number mode"),
        ("order__createdAt" = Option<String>, Query, description = "ASC or DESC (default ASC)"),
        ("where__id__less_than" = Option<i64>, Query, description = "Cursor bound, checked first"),
        ("where__id__more_than" = Option<i64>, Query, description = "Cursor bound")
    ),
    responses(
        (status = 200, description = "Cursor page or numbered page", body = PostsPageDto),
        (status = 400, description = "Malformed query"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<(StatusCode, Json<PostsPageDto>)> {
    let Query(pairs) = query?;
    let query = PaginatePostsQuery::from_pairs(pairs)?;
    if query.take > MAX_TAKE {
        return Err(AppError::BadRequest(format!("take must be <= {MAX_TAKE}")));
    }

    let page = state.posts_service.paginate_posts(query).await?;
    Ok((StatusCode::OK, Json(PostsPageDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let post = state.posts_service.get_post(id).await?;
    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        author_id: dto.author_id,
        title: dto.title,
        content: dto.content,
        image: dto.image,
    };

    let post = state.posts_service.create_post(req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    post,
    path = "/posts/random",
    tag = "posts",
    request_body = GeneratePostsDto,
    responses(
        (status = 201, description = "Posts generated", body = GeneratedPostsDto),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn generate_posts(
    State(state): State<AppState>,
    Json(dto): Json<GeneratePostsDto>,
) -> AppResult<(StatusCode, Json<GeneratedPostsDto>)> {
    let created = state.posts_service.generate_posts(dto.author_id).await?;
    Ok((StatusCode::CREATED, Json(GeneratedPostsDto { created })))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
    };

    let post = state.posts_service.update_post(id, req).await?;
    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = DeletedPostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<DeletedPostDto>)> {
    let id = state.posts_service.delete_post(id).await?;
    Ok((StatusCode::OK, Json(DeletedPostDto { id })))
}
