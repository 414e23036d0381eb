use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::companies::{
    CompanyEntity, InsertCompanyEntity, UpdateCompanyMembershipEntity,
};

#[automock]
#[async_trait]
pub trait CompanyRepository {
    async fn list(&self) -> Result<Vec<CompanyEntity>>;
    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<CompanyEntity>>;
    async fn find_by_id(&self, company_id: i32) -> Result<Option<CompanyEntity>>;
    async fn create(&self, company: InsertCompanyEntity) -> Result<CompanyEntity>;
    async fn update(
        &self,
        company_id: i32,
        company: InsertCompanyEntity,
    ) -> Result<Option<CompanyEntity>>;
    async fn update_membership(
        &self,
        company_id: i32,
        membership: UpdateCompanyMembershipEntity,
    ) -> Result<Option<CompanyEntity>>;
    async fn delete(&self, company_id: i32) -> Result<bool>;
}
