//! User service - user administration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

const USERNAME_TAKEN: &str = "Username already exists";

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users by username.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Create a user, hashing the password. Usernames are unique.
    async fn create_user(
        &self,
        username: String,
        password: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn create_user(
        &self,
        username: String,
        password: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User> {
        let username = username.trim().to_string();

        if self.uow.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict(USERNAME_TAKEN));
        }

        let password_hash = Password::new(&password)?.into_string();
        let new_user = NewUser {
            username,
            password_hash,
            name: name.trim().to_string(),
            role,
        };

        match self.uow.users().create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "User created");
                Ok(user)
            }
            Err(e) if e.is_unique_violation() => Err(AppError::conflict(USERNAME_TAKEN)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MockRepos;
    use chrono::Utc;

    fn stored(user: NewUser) -> User {
        User {
            id: 1,
            username: user.username,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_username().returning(|_| Ok(None));
        repos
            .users
            .expect_create()
            .withf(|u| u.username == "jdoe" && u.password_hash.starts_with("$argon2"))
            .times(1)
            .returning(|u| Ok(stored(u)));

        let service = UserManager::new(repos.into_uow());
        let user = service
            .create_user(" jdoe ".into(), "secret123".into(), "John Doe".into(), UserRole::User)
            .await
            .unwrap();

        assert_eq!(user.username, "jdoe");
        assert!(Password::from_hash(user.password_hash).verify("secret123"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username_conflict() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_username().returning(|name| {
            Ok(Some(stored(NewUser {
                username: name.to_string(),
                password_hash: String::new(),
                name: "Existing".into(),
                role: UserRole::User,
            })))
        });
        repos.users.expect_create().never();

        let service = UserManager::new(repos.into_uow());
        let result = service
            .create_user("jdoe".into(), "secret123".into(), "John Doe".into(), UserRole::Admin)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(ref m)) if m == USERNAME_TAKEN));
    }

    #[tokio::test]
    async fn test_create_user_short_password_rejected() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_username().returning(|_| Ok(None));
        repos.users.expect_create().never();

        let service = UserManager::new(repos.into_uow());
        let result = service
            .create_user("jdoe".into(), "123".into(), "John Doe".into(), UserRole::User)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
