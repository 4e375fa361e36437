use async_trait::async_trait;
use diesel::prelude::*;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::provider_configs;
use fxhub_core::errors::{DatabaseError, Error, Result};
use fxhub_core::rates::ProviderConfigRepositoryTrait;
use fxhub_providers::ProviderConfig;

#[derive(Debug, Clone, Queryable, Insertable, Identifiable, AsChangeset)]
#[diesel(table_name = provider_configs)]
pub struct ProviderConfigDB {
    pub id: String,
    pub name: String,
    pub implementation: String,
    pub priority: i32,
    pub active: bool,
}

impl From<ProviderConfigDB> for ProviderConfig {
    fn from(db: ProviderConfigDB) -> Self {
        ProviderConfig {
            id: db.id,
            name: db.name,
            implementation: db.implementation,
            priority: db.priority,
            active: db.active,
        }
    }
}

impl From<ProviderConfig> for ProviderConfigDB {
    fn from(config: ProviderConfig) -> Self {
        ProviderConfigDB {
            id: config.id,
            name: config.name,
            implementation: config.implementation,
            priority: config.priority,
            active: config.active,
        }
    }
}

#[derive(Clone)]
pub struct ProviderConfigRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl ProviderConfigRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProviderConfigRepositoryTrait for ProviderConfigRepository {
    fn get_active(&self) -> Result<Vec<ProviderConfig>> {
        let mut conn = get_connection(&self.pool)?;
        provider_configs::table
            .filter(provider_configs::active.eq(true))
            .order_by(provider_configs::priority.asc())
            .load::<ProviderConfigDB>(&mut conn)
            .map(|rows| rows.into_iter().map(ProviderConfig::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn list(&self) -> Result<Vec<ProviderConfig>> {
        let mut conn = get_connection(&self.pool)?;
        provider_configs::table
            .order_by(provider_configs::priority.asc())
            .load::<ProviderConfigDB>(&mut conn)
            .map(|rows| rows.into_iter().map(ProviderConfig::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    async fn insert(&self, config: ProviderConfig) -> Result<ProviderConfig> {
        self.writer
            .exec(move |conn| {
                let row = ProviderConfigDB::from(config);
                diesel::insert_into(provider_configs::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(ProviderConfig::from(row))
            })
            .await
    }

    async fn update(&self, config: ProviderConfig) -> Result<ProviderConfig> {
        self.writer
            .exec(move |conn| {
                let row = ProviderConfigDB::from(config);
                let updated = diesel::update(provider_configs::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "provider config '{}'",
                        row.id
                    ))));
                }
                Ok(ProviderConfig::from(row))
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(provider_configs::table.find(&id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
