use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::pagination::SortOrder;
use crate::domain::post::Post;

const POST_COLUMNS: &str =
    "id, author_id, title, content, image, like_count, comment_count, created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    title: String,
    content: String,
    image: Option<String>,
    like_count: i32,
    comment_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (author_id, title, content, image, like_count, comment_count)
            VALUES ($1, $2, $3, $4, 0, 0)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(input.author_id)
        .bind(input.title)
        .bind(input.content)
        .bind(input.image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(
        &self,
        filter: PostFilter,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<Post>, DomainError> {
        let mut query = build_find_query(filter, order, limit);
        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn find_and_count(
        &self,
        skip: u64,
        limit: u32,
        order: SortOrder,
    ) -> Result<(Vec<Post>, i64), DomainError> {
        let offset = i64::try_from(skip).map_err(|_| DomainError::Validation {
            field: "page",
            message: "is out of range",
        })?;
        let direction = order_sql(order);

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            ORDER BY created_at {direction}, id {direction}
            LIMIT $1
            OFFSET $2
            "#
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let posts = rows
            .into_iter()
            .map(map_row_to_post)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((posts, total))
    }
}

fn build_find_query(
    filter: PostFilter,
    order: SortOrder,
    limit: u32,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts"));

    match filter {
        PostFilter::All => {}
        PostFilter::IdLessThan(bound) => {
            query.push(" WHERE id < ").push_bind(bound);
        }
        PostFilter::IdMoreThan(bound) => {
            query.push(" WHERE id > ").push_bind(bound);
        }
    }

    let direction = order_sql(order);
    query
        .push(format!(" ORDER BY created_at {direction}, id {direction} LIMIT "))
        .push_bind(i64::from(limit));

    query
}

fn order_sql(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.author_id,
        row.title,
        row.content,
        row.created_at,
        row.updated_at,
    )
    .and_then(|post| post.with_counters(row.like_count, row.comment_count))
    .map(|post| post.with_image(row.image))
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("author".to_string());
    }
    DomainError::Storage(err)
}
