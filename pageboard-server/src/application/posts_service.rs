use tracing::{debug, info};

use crate::application::pagination::{CursorPageAssembler, cursor_filter};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::pagination::{CursorPage, NumberedPage, PaginatePostsQuery, PostsPage};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

pub(crate) struct PostsService<R: PostRepository> {
    repo: R,
    pages: CursorPageAssembler,
}

impl<R: PostRepository> PostsService<R> {
    pub(crate) const GENERATED_POSTS: usize = 100;

    pub(crate) fn new(repo: R, pages: CursorPageAssembler) -> Self {
        Self { repo, pages }
    }

    pub(crate) async fn create_post(&self, req: CreatePostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            author_id: req.author_id,
            title: req.title,
            content: req.content,
            image: req.image,
        };
        let post = self.repo.create_post(new_post).await?;
        info!(post_id = post.id, author_id = post.author_id, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn update_post(
        &self,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        if req.is_empty() {
            return self.get_post(post_id).await;
        }

        let patch = PostPatch {
            title: req.title,
            content: req.content,
        };
        let post = self
            .repo
            .update_post(post_id, patch)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;
        info!(post_id, "post updated");
        Ok(post)
    }

    pub(crate) async fn delete_post(&self, post_id: i64) -> Result<i64, DomainError> {
        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        info!(post_id, "post deleted");
        Ok(post_id)
    }

    /// Seeds `GENERATED_POSTS` posts for `author_id`.
    pub(crate) async fn generate_posts(&self, author_id: i64) -> Result<usize, DomainError> {
        for i in 0..Self::GENERATED_POSTS {
            self.create_post(CreatePostRequest {
                author_id,
                title: format!("Generated post title {i}"),
                content: format!("Generated post content {i}"),
                image: None,
            })
            .await?;
        }
        Ok(Self::GENERATED_POSTS)
    }

    /// Page-number mode when a non-zero `page` is present, cursor mode otherwise.
    pub(crate) async fn paginate_posts(
        &self,
        query: PaginatePostsQuery,
    ) -> Result<PostsPage, DomainError> {
        match query.page_number() {
            Some(page) => self
                .paginate_by_page(&query, page)
                .await
                .map(PostsPage::Numbered),
            None => self
                .paginate_by_cursor(&query)
                .await
                .map(PostsPage::Cursor),
        }
    }

    async fn paginate_by_page(
        &self,
        query: &PaginatePostsQuery,
        page: u32,
    ) -> Result<NumberedPage, DomainError> {
        let skip = u64::from(query.take) * u64::from(page - 1);
        debug!(take = query.take, page, skip, "paginating posts by page number");

        let (data, total) = self
            .repo
            .find_and_count(skip, query.take, query.order_created_at)
            .await?;

        Ok(NumberedPage { data, total })
    }

    async fn paginate_by_cursor(
        &self,
        query: &PaginatePostsQuery,
    ) -> Result<CursorPage, DomainError> {
        let filter = cursor_filter(query);
        debug!(take = query.take, ?filter, "paginating posts by cursor");

        let posts = self
            .repo
            .find(filter, query.order_created_at, query.take)
            .await?;

        Ok(self.pages.assemble(posts, query))
    }
}
