use std::sync::Arc;

use crates::domain::{
    repositories::categories::CategoryRepository,
    value_objects::{
        categories::{CategoryModel, UpsertCategoryModel},
        iam::Actor,
    },
};
use tracing::{error, info};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult, ensure_admin};

pub struct CategoryUseCase<C>
where
    C: CategoryRepository + Send + Sync + 'static,
{
    category_repo: Arc<C>,
}

impl<C> CategoryUseCase<C>
where
    C: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(category_repo: Arc<C>) -> Self {
        Self { category_repo }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<CategoryModel>> {
        let categories = self.category_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "categories: failed to list categories");
            UseCaseError::Internal(err)
        })?;

        Ok(categories.into_iter().map(CategoryModel::from).collect())
    }

    pub async fn get(&self, category_id: i32) -> UseCaseResult<CategoryModel> {
        let category = self
            .category_repo
            .find_by_id(category_id)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: failed to load category");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("category"))?;

        Ok(category.into())
    }

    pub async fn create(
        &self,
        actor: Actor,
        model: UpsertCategoryModel,
    ) -> UseCaseResult<CategoryModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let category = self
            .category_repo
            .create(model.to_entity())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "categories: failed to create category");
                UseCaseError::from_write(err)
            })?;

        info!(category_id = category.id, user_id = actor.user_id, "categories: category created");
        Ok(category.into())
    }

    pub async fn update(
        &self,
        actor: Actor,
        category_id: i32,
        model: UpsertCategoryModel,
    ) -> UseCaseResult<CategoryModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let category = self
            .category_repo
            .update(category_id, model.to_entity())
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: failed to update category");
                UseCaseError::from_write(err)
            })?
            .ok_or(UseCaseError::NotFound("category"))?;

        info!(%category_id, user_id = actor.user_id, "categories: category updated");
        Ok(category.into())
    }

    pub async fn delete(&self, actor: Actor, category_id: i32) -> UseCaseResult<()> {
        ensure_admin(&actor)?;

        let deleted = self.category_repo.delete(category_id).await.map_err(|err| {
            error!(%category_id, db_error = ?err, "categories: failed to delete category");
            UseCaseError::Internal(err)
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("category"));
        }

        info!(%category_id, user_id = actor.user_id, "categories: category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use crates::domain::{
        entities::categories::CategoryEntity, repositories::categories::MockCategoryRepository,
        value_objects::enums::user_roles::UserRole,
    };
    use mockall::predicate::eq;

    fn upsert(name: &str) -> UpsertCategoryModel {
        UpsertCategoryModel {
            name: name.to_string(),
            description: Some("  ".to_string()),
            icon: Some("factory".to_string()),
        }
    }

    #[tokio::test]
    async fn non_admin_cannot_create_category() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().never();

        let usecase = CategoryUseCase::new(Arc::new(repo));
        let err = usecase
            .create(Actor::new(3, UserRole::Representative), upsert("Industria"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_creates_trimmed_category() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create()
            .withf(|entity| entity.name == "Industria" && entity.description.is_none())
            .times(1)
            .returning(|entity| {
                let now = Utc::now();
                Ok(CategoryEntity {
                    id: 11,
                    name: entity.name,
                    description: entity.description,
                    icon: entity.icon,
                    created_at: now,
                    updated_at: now,
                })
            });

        let usecase = CategoryUseCase::new(Arc::new(repo));
        let created = usecase
            .create(Actor::new(1, UserRole::Admin), upsert(" Industria "))
            .await
            .unwrap();

        assert_eq!(created.id, 11);
        assert_eq!(created.icon.as_deref(), Some("factory"));
    }

    #[tokio::test]
    async fn blank_name_is_a_validation_error() {
        let repo = MockCategoryRepository::new();
        let usecase = CategoryUseCase::new(Arc::new(repo));

        let err = usecase
            .create(Actor::new(1, UserRole::Admin), upsert(""))
            .await
            .unwrap_err();

        match err {
            UseCaseError::Validation(fields) => assert!(fields.contains_key("name")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn deleting_missing_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete()
            .with(eq(99))
            .times(1)
            .returning(|_| Ok(false));

        let usecase = CategoryUseCase::new(Arc::new(repo));
        let err = usecase
            .delete(Actor::new(1, UserRole::Admin), 99)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
