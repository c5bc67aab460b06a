use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{CreateUserRequest, User};

pub(crate) struct UsersService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UsersService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_user(&self, req: CreateUserRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        let password_hash = Self::hash_password(&req.password)?;
        let new_user = NewUser {
            nickname: req.nickname,
            email: req.email,
            password_hash,
        };

        let user = self.repo.create_user(new_user).await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub(crate) async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list_users().await
    }

    pub(crate) fn hash_password(raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
