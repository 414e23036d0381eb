use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::{
    companies::UpdateCompanyMembershipEntity,
    membership_payments::{InsertMembershipPaymentEntity, MembershipPaymentEntity},
};

#[automock]
#[async_trait]
pub trait MembershipPaymentRepository {
    /// Fails with `UniqueViolation` when the payment intent is already recorded.
    async fn create(
        &self,
        payment: InsertMembershipPaymentEntity,
    ) -> Result<MembershipPaymentEntity>;
    async fn find_by_id(&self, payment_id: i32) -> Result<Option<MembershipPaymentEntity>>;
    async fn find_by_intent_id(
        &self,
        payment_intent_id: String,
    ) -> Result<Option<MembershipPaymentEntity>>;
    async fn list(&self) -> Result<Vec<MembershipPaymentEntity>>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<MembershipPaymentEntity>>;
    /// Only rows still `pending` or `failed` are touched; `None` otherwise.
    async fn update_status(
        &self,
        payment_id: i32,
        status: String,
    ) -> Result<Option<MembershipPaymentEntity>>;
    /// Marks the payment succeeded and moves the company onto the purchased
    /// plan in a single transaction. Returns `None` without touching the
    /// company when the row already left `pending`/`failed`.
    async fn settle_succeeded(
        &self,
        payment_id: i32,
        company_id: i32,
        membership: UpdateCompanyMembershipEntity,
    ) -> Result<Option<MembershipPaymentEntity>>;
}
