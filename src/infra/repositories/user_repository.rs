//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a user. A duplicate username surfaces as a unique violation.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// All users ordered by username.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(User::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            role: Set(user.role.as_str().to_string()),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(User::from(model))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<User>> {
    Ok(UserEntity::find_by_id(id).one(db).await?.map(User::from))
}
