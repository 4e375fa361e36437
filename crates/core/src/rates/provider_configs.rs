use std::sync::Arc;
use uuid::Uuid;

use super::rates_traits::ProviderConfigRepositoryTrait;
use crate::errors::{Result, ValidationError};
use fxhub_providers::{ProviderConfig, ProviderFactory};

/// Admin surface over provider configurations.
///
/// Every write is validated against the factory so a config row can never
/// reference an implementation the registry would have to skip at load time.
#[derive(Clone)]
pub struct ProviderConfigService {
    repository: Arc<dyn ProviderConfigRepositoryTrait>,
    factory: Arc<ProviderFactory>,
}

impl ProviderConfigService {
    pub fn new(
        repository: Arc<dyn ProviderConfigRepositoryTrait>,
        factory: Arc<ProviderFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }

    pub fn list_configs(&self) -> Result<Vec<ProviderConfig>> {
        self.repository.list()
    }

    pub async fn create_config(&self, mut config: ProviderConfig) -> Result<ProviderConfig> {
        self.validate(&config)?;
        if config.id.is_empty() {
            config.id = Uuid::new_v4().to_string();
        }
        self.repository.insert(config).await
    }

    pub async fn update_config(&self, config: ProviderConfig) -> Result<ProviderConfig> {
        self.validate(&config)?;
        self.repository.update(config).await
    }

    pub async fn delete_config(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        if config.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if !self.factory.is_registered(&config.implementation) {
            return Err(
                ValidationError::UnknownImplementation(config.implementation.clone()).into(),
            );
        }
        Ok(())
    }
}
