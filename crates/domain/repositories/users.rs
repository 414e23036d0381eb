use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn list(&self) -> Result<Vec<UserEntity>>;
    async fn find_by_id(&self, user_id: i32) -> Result<Option<UserEntity>>;
    async fn find_by_uid(&self, uid: String) -> Result<Option<UserEntity>>;
    async fn create(&self, user: InsertUserEntity) -> Result<UserEntity>;
    async fn update(&self, user_id: i32, changes: UpdateUserEntity) -> Result<Option<UserEntity>>;
    async fn delete(&self, user_id: i32) -> Result<bool>;
}
