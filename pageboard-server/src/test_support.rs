use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::application::pagination::CursorPageAssembler;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::pagination::SortOrder;
use crate::domain::post::Post;
use crate::domain::user::{Role, User};

pub(crate) const POSTS_URL: &str = "http://localhost:3000/posts";

pub(crate) fn test_assembler() -> CursorPageAssembler {
    CursorPageAssembler::new(Url::parse(POSTS_URL).expect("posts url must parse"))
}

fn created_at_for(id: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp") + Duration::minutes(id)
}

pub(crate) fn sample_post(id: i64) -> Post {
    Post::new(
        id,
        1,
        format!("title {id}"),
        format!("content {id}"),
        created_at_for(id),
        created_at_for(id),
    )
    .expect("sample post must be valid")
}

pub(crate) fn sample_posts(ids: impl IntoIterator<Item = i64>) -> Vec<Post> {
    ids.into_iter().map(sample_post).collect()
}

fn filter_matches(filter: PostFilter, post: &Post) -> bool {
    match filter {
        PostFilter::All => true,
        PostFilter::IdLessThan(bound) => post.id < bound,
        PostFilter::IdMoreThan(bound) => post.id > bound,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RepoCall {
    Find(PostFilter, SortOrder, u32),
    FindAndCount(u64, u32, SortOrder),
}

#[derive(Default)]
struct PostState {
    posts: Vec<Post>,
    fail_reads: bool,
    calls: Vec<RepoCall>,
}

/// Post storage backed by a vector, with call recording.
#[derive(Clone, Default)]
pub(crate) struct InMemoryPostRepository {
    state: Arc<Mutex<PostState>>,
}

impl InMemoryPostRepository {
    pub(crate) fn with_posts(count: i64) -> Self {
        let repo = Self::default();
        repo.state.lock().expect("post state mutex poisoned").posts = sample_posts(1..=count);
        repo
    }

    pub(crate) fn fail_reads(&self) {
        self.state.lock().expect("post state mutex poisoned").fail_reads = true;
    }

    pub(crate) fn calls(&self) -> Vec<RepoCall> {
        self.state
            .lock()
            .expect("post state mutex poisoned")
            .calls
            .clone()
    }

    pub(crate) fn snapshot(&self) -> Vec<Post> {
        self.state
            .lock()
            .expect("post state mutex poisoned")
            .posts
            .clone()
    }

    fn sorted(posts: &[Post], order: SortOrder) -> Vec<Post> {
        let mut posts = posts.to_vec();
        posts.sort_by_key(|post| (post.created_at, post.id));
        if order == SortOrder::Desc {
            posts.reverse();
        }
        posts
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.state.lock().expect("post state mutex poisoned");
        let id = state.posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        let post = Post::new(
            id,
            input.author_id,
            input.title,
            input.content,
            created_at_for(id),
            created_at_for(id),
        )?
        .with_image(input.image);
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.state.lock().expect("post state mutex poisoned");
        Ok(state.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut state = self.state.lock().expect("post state mutex poisoned");
        let Some(post) = state.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        post.updated_at += Duration::seconds(1);
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.state.lock().expect("post state mutex poisoned");
        let before = state.posts.len();
        state.posts.retain(|post| post.id != id);
        Ok(state.posts.len() < before)
    }

    async fn find(
        &self,
        filter: PostFilter,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<Post>, DomainError> {
        let mut state = self.state.lock().expect("post state mutex poisoned");
        state.calls.push(RepoCall::Find(filter, order, limit));
        if state.fail_reads {
            return Err(DomainError::Storage(sqlx::Error::PoolTimedOut));
        }

        let matching: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| filter_matches(filter, post))
            .cloned()
            .collect();
        Ok(Self::sorted(&matching, order)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn find_and_count(
        &self,
        skip: u64,
        limit: u32,
        order: SortOrder,
    ) -> Result<(Vec<Post>, i64), DomainError> {
        let mut state = self.state.lock().expect("post state mutex poisoned");
        state.calls.push(RepoCall::FindAndCount(skip, limit, order));
        if state.fail_reads {
            return Err(DomainError::Storage(sqlx::Error::PoolTimedOut));
        }

        let total = state.posts.len() as i64;
        let page = Self::sorted(&state.posts, order)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}

#[derive(Default)]
struct UserState {
    users: Vec<User>,
    created_input: Option<NewUser>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryUserRepository {
    state: Arc<Mutex<UserState>>,
}

impl InMemoryUserRepository {
    pub(crate) fn take_created_input(&self) -> Option<NewUser> {
        self.state
            .lock()
            .expect("user state mutex poisoned")
            .created_input
            .take()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.lock().expect("user state mutex poisoned");
        if state
            .users
            .iter()
            .any(|user| user.nickname == input.nickname)
        {
            return Err(DomainError::AlreadyExists("nickname".to_string()));
        }

        let id = state.users.len() as i64 + 1;
        let now = Utc::now();
        let user = User::new(id, &input.nickname, &input.email, Role::User, now, now)?;
        state.users.push(user.clone());
        state.created_input = Some(input);
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self
            .state
            .lock()
            .expect("user state mutex poisoned")
            .users
            .clone())
    }
}
