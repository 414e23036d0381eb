use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::opinions::{
    InsertOpinionEntity, OpinionDecisionEntity, OpinionEntity,
};

#[automock]
#[async_trait]
pub trait OpinionRepository {
    async fn create(&self, opinion: InsertOpinionEntity) -> Result<OpinionEntity>;
    async fn find_by_id(&self, opinion_id: i32) -> Result<Option<OpinionEntity>>;
    /// `status` narrows the result when set.
    async fn list(&self, status: Option<String>) -> Result<Vec<OpinionEntity>>;
    async fn list_by_companies(
        &self,
        company_ids: Vec<i32>,
        status: Option<String>,
    ) -> Result<Vec<OpinionEntity>>;
    async fn decide(
        &self,
        opinion_id: i32,
        decision: OpinionDecisionEntity,
    ) -> Result<Option<OpinionEntity>>;
    async fn delete(&self, opinion_id: i32) -> Result<bool>;
}
