use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::system_settings::{SystemSettingsEntity, UpsertSystemSettingsEntity};

#[automock]
#[async_trait]
pub trait SystemSettingsRepository {
    async fn get(&self) -> Result<Option<SystemSettingsEntity>>;
    async fn upsert(&self, settings: UpsertSystemSettingsEntity) -> Result<SystemSettingsEntity>;
}
