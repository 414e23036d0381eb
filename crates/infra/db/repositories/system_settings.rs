use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::system_settings};
use domain::{
    entities::system_settings::{
        SYSTEM_SETTINGS_ID, SystemSettingsEntity, UpsertSystemSettingsEntity,
    },
    repositories::system_settings::SystemSettingsRepository,
};

pub struct SystemSettingsPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SystemSettingsPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SystemSettingsRepository for SystemSettingsPostgres {
    async fn get(&self) -> Result<Option<SystemSettingsEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = system_settings::table
            .filter(system_settings::id.eq(SYSTEM_SETTINGS_ID))
            .select(SystemSettingsEntity::as_select())
            .first::<SystemSettingsEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn upsert(&self, settings: UpsertSystemSettingsEntity) -> Result<SystemSettingsEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(system_settings::table)
            .values(&settings)
            .on_conflict(system_settings::id)
            .do_update()
            .set((&settings, system_settings::updated_at.eq(Utc::now())))
            .returning(SystemSettingsEntity::as_returning())
            .get_result::<SystemSettingsEntity>(&mut conn)?;

        Ok(result)
    }
}
