//! Dummy domain service — placeholder business logic for the skeleton.
//!
//! The service receives the request-scoped logger explicitly, proving that
//! structured logging is available below the handler layer without any global
//! state. Absence of a logger (`None`) is tolerated: the service still works,
//! it just logs nothing.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::logger::{Field, Logger};

/// Errors produced by the dummy service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The entity name contains numbers.
    #[error("entity name must not contain numbers")]
    WrongEntity,
}

/// Storage port consumed by the dummy service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_entity(&self, logger: Option<Logger>, entity: &str) -> String;
}

/// Port exposed to the REST driver.
#[async_trait]
pub trait HelloService: Send + Sync {
    async fn hello(&self, logger: Option<Logger>, entity: &str) -> Result<String, ServiceError>;
}

/// Dummy implementation of [`HelloService`] backed by a [`Storage`].
pub struct DummyService {
    storage: Arc<dyn Storage>,
}

impl DummyService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl HelloService for DummyService {
    async fn hello(&self, logger: Option<Logger>, entity: &str) -> Result<String, ServiceError> {
        if let Some(logger) = &logger {
            logger.info("Hello called from core service", [Field::new("entity", entity)]);
        }

        // Example of a domain error that the REST layer maps to a 400.
        if entity.chars().any(|c| c.is_ascii_digit()) {
            return Err(ServiceError::WrongEntity);
        }

        let stored = self.storage.get_entity(logger, entity).await;
        Ok(format!("Hello {stored}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemorySink;

    #[tokio::test]
    async fn hello_greets_entity_from_storage() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_entity()
            .returning(|_, entity| entity.to_owned());

        let service = DummyService::new(Arc::new(storage));
        let greeting = service.hello(None, "alice").await.unwrap();
        assert_eq!(greeting, "Hello alice");
    }

    #[tokio::test]
    async fn hello_rejects_entities_with_numbers() {
        let mut storage = MockStorage::new();
        storage.expect_get_entity().never();

        let service = DummyService::new(Arc::new(storage));
        let err = service.hello(None, "f00").await.unwrap_err();
        assert_eq!(err, ServiceError::WrongEntity);
    }

    #[tokio::test]
    async fn hello_logs_through_the_injected_logger() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_entity()
            .returning(|_, entity| entity.to_owned());

        let sink = Arc::new(MemorySink::default());
        let logger = Logger::new("test-svc", sink.clone());

        let service = DummyService::new(Arc::new(storage));
        service.hello(Some(logger), "alice").await.unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Hello called from core service");
        assert_eq!(records[0].fields["entity"], serde_json::json!("alice"));
    }
}
