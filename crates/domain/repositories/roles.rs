use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::roles::{RoleEntity, InsertRoleEntity};

#[automock]
#[async_trait]
pub trait RoleRepository {
    async fn list(&self) -> Result<Vec<RoleEntity>>;
    async fn find_by_id(&self, role_id: i32) -> Result<Option<RoleEntity>>;
    async fn create(&self, role: InsertRoleEntity) -> Result<RoleEntity>;
    async fn update(&self, role_id: i32, role: InsertRoleEntity) -> Result<Option<RoleEntity>>;
    async fn delete(&self, role_id: i32) -> Result<bool>;
}
