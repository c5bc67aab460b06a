use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{CreateUserRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateUserDto {
    #[validate(length(min = 1, max = 20))]
    pub(crate) nickname: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 3, max = 8))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) nickname: String,
    pub(crate) email: String,
    /// `user` or `admin`.
    pub(crate) role: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Nickname or email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;
    let req = CreateUserRequest {
        nickname: dto.nickname,
        email: dto.email,
        password: dto.password,
    };

    let user = state.users_service.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users ordered by id", body = [UserDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<UserDto>>)> {
    let users = state.users_service.list_users().await?;
    Ok((
        StatusCode::OK,
        Json(users.into_iter().map(UserDto::from).collect()),
    ))
}
