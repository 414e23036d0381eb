use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::membership_types::{MembershipTypeEntity, InsertMembershipTypeEntity};

#[automock]
#[async_trait]
pub trait MembershipTypeRepository {
    async fn list(&self) -> Result<Vec<MembershipTypeEntity>>;
    async fn find_by_id(&self, membership_type_id: i32) -> Result<Option<MembershipTypeEntity>>;
    async fn create(
        &self,
        membership_type: InsertMembershipTypeEntity,
    ) -> Result<MembershipTypeEntity>;
    async fn update(
        &self,
        membership_type_id: i32,
        membership_type: InsertMembershipTypeEntity,
    ) -> Result<Option<MembershipTypeEntity>>;
    async fn delete(&self, membership_type_id: i32) -> Result<bool>;
}
