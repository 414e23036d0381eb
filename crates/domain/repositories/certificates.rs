use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::certificates::{CertificateEntity, InsertCertificateEntity};

#[automock]
#[async_trait]
pub trait CertificateRepository {
    async fn list(&self) -> Result<Vec<CertificateEntity>>;
    async fn find_by_id(&self, certificate_id: i32) -> Result<Option<CertificateEntity>>;
    async fn create(&self, certificate: InsertCertificateEntity) -> Result<CertificateEntity>;
    async fn update(
        &self,
        certificate_id: i32,
        certificate: InsertCertificateEntity,
    ) -> Result<Option<CertificateEntity>>;
    async fn delete(&self, certificate_id: i32) -> Result<bool>;
}
