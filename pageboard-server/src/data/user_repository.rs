use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) nickname: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;
}

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        (**self).create_user(input).await
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        (**self).list_users().await
    }
}
