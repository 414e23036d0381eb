use std::sync::Arc;

use crates::domain::{
    repositories::certificates::CertificateRepository,
    value_objects::{
        certificates::{CertificateModel, UpsertCertificateModel},
        iam::Actor,
    },
};
use tracing::{error, info};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult, ensure_admin};

pub struct CertificateUseCase<C>
where
    C: CertificateRepository + Send + Sync + 'static,
{
    certificate_repo: Arc<C>,
}

impl<C> CertificateUseCase<C>
where
    C: CertificateRepository + Send + Sync + 'static,
{
    pub fn new(certificate_repo: Arc<C>) -> Self {
        Self { certificate_repo }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<CertificateModel>> {
        let certificates = self.certificate_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "certificates: failed to list certificates");
            UseCaseError::Internal(err)
        })?;

        Ok(certificates.into_iter().map(CertificateModel::from).collect())
    }

    pub async fn get(&self, certificate_id: i32) -> UseCaseResult<CertificateModel> {
        self.certificate_repo
            .find_by_id(certificate_id)
            .await
            .map_err(|err| {
                error!(%certificate_id, db_error = ?err, "certificates: failed to load certificate");
                UseCaseError::Internal(err)
            })?
            .map(CertificateModel::from)
            .ok_or(UseCaseError::NotFound("certificate"))
    }

    pub async fn create(
        &self,
        actor: Actor,
        model: UpsertCertificateModel,
    ) -> UseCaseResult<CertificateModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let certificate = self
            .certificate_repo
            .create(model.to_entity())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "certificates: failed to create certificate");
                UseCaseError::from_write(err)
            })?;

        info!(
            certificate_id = certificate.id,
            user_id = actor.user_id,
            "certificates: certificate created"
        );
        Ok(certificate.into())
    }

    pub async fn update(
        &self,
        actor: Actor,
        certificate_id: i32,
        model: UpsertCertificateModel,
    ) -> UseCaseResult<CertificateModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let certificate = self
            .certificate_repo
            .update(certificate_id, model.to_entity())
            .await
            .map_err(|err| {
                error!(%certificate_id, db_error = ?err, "certificates: failed to update certificate");
                UseCaseError::from_write(err)
            })?
            .ok_or(UseCaseError::NotFound("certificate"))?;

        info!(%certificate_id, user_id = actor.user_id, "certificates: certificate updated");
        Ok(certificate.into())
    }

    pub async fn delete(&self, actor: Actor, certificate_id: i32) -> UseCaseResult<()> {
        ensure_admin(&actor)?;

        let deleted = self
            .certificate_repo
            .delete(certificate_id)
            .await
            .map_err(|err| {
                error!(%certificate_id, db_error = ?err, "certificates: failed to delete certificate");
                UseCaseError::Internal(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("certificate"));
        }

        info!(%certificate_id, user_id = actor.user_id, "certificates: certificate deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crates::domain::{
        repositories::certificates::MockCertificateRepository,
        value_objects::enums::{record_statuses::RecordStatus, user_roles::UserRole},
    };

    fn upsert(image: &str) -> UpsertCertificateModel {
        UpsertCertificateModel {
            name: "ISO 9001".to_string(),
            image: Some(image.to_string()),
            description: None,
            issue_date: Some("2024".to_string()),
            expiry_date: None,
            issuing_entity: Some("IMNC".to_string()),
            status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn invalid_image_url_is_rejected_before_persisting() {
        let mut repo = MockCertificateRepository::new();
        repo.expect_create().never();

        let usecase = CertificateUseCase::new(Arc::new(repo));
        let err = usecase
            .create(Actor::new(1, UserRole::Admin), upsert("not a url"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn regular_user_cannot_delete_certificate() {
        let mut repo = MockCertificateRepository::new();
        repo.expect_delete().never();

        let usecase = CertificateUseCase::new(Arc::new(repo));
        let err = usecase
            .delete(Actor::new(8, UserRole::User), 4)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_certificate_is_not_found() {
        let mut repo = MockCertificateRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = CertificateUseCase::new(Arc::new(repo));
        let err = usecase.get(5).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
