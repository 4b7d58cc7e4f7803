//! Dummy storage backend — placeholder persistence for the skeleton.

use async_trait::async_trait;

use crate::logger::{Field, Logger};
use crate::service::Storage;

/// Storage that echoes the entity back, logging through the injected logger
/// to show that request-scoped logging reaches the lowest layer.
#[derive(Debug, Default)]
pub struct DummyStorage;

#[async_trait]
impl Storage for DummyStorage {
    async fn get_entity(&self, logger: Option<Logger>, entity: &str) -> String {
        if let Some(logger) = &logger {
            logger.info(
                "GetEntity called from dummy storage",
                [Field::new("entity", entity)],
            );
        }
        entity.to_owned()
    }
}
