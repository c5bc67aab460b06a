use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::pagination::SortOrder;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

/// Predicate over the post identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PostFilter {
    #[default]
    All,
    IdLessThan(i64),
    IdMoreThan(i64),
}

/// Rows come back ordered by `created_at` (ties by `id`) in `order`.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn find(
        &self,
        filter: PostFilter,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<Post>, DomainError>;
    async fn find_and_count(
        &self,
        skip: u64,
        limit: u32,
        order: SortOrder,
    ) -> Result<(Vec<Post>, i64), DomainError>;
}

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        (**self).create_post(input).await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        (**self).get_post(id).await
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        (**self).update_post(id, patch).await
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        (**self).delete_post(id).await
    }

    async fn find(
        &self,
        filter: PostFilter,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<Post>, DomainError> {
        (**self).find(filter, order, limit).await
    }

    async fn find_and_count(
        &self,
        skip: u64,
        limit: u32,
        order: SortOrder,
    ) -> Result<(Vec<Post>, i64), DomainError> {
        (**self).find_and_count(skip, limit, order).await
    }
}
