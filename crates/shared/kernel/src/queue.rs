//! Queue manager with pluggable connectors, plus the worker modules wrap.

use crate::app::{Application, BoxError, ServiceProvider};
use crate::container::ContainerError;
use crate::keys;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[hzn_derive::hzn_error]
pub enum QueueError {
    #[error("Unknown queue connector{}: {message}", format_context(.context))]
    UnknownConnector { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Queue connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Queue dependency failed{}: {source}", format_context(.context))]
    Resolution { source: ContainerError, context: Option<Cow<'static, str>> },
}

/// A connected queue, described rather than opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueConnection {
    pub driver: String,
    pub connection: String,
    pub endpoint: String,
    pub prefix: Option<String>,
}

/// Turns a connection name into a [`QueueConnection`].
pub trait Connector: Send + Sync {
    /// # Errors
    /// Fails when the named connection cannot be established.
    fn connect(&self, connection: &str) -> Result<QueueConnection, QueueError>;
}

/// Builds a connector on demand, so its dependencies resolve late.
pub type ConnectorFactory = Arc<dyn Fn() -> Result<Box<dyn Connector>, QueueError> + Send + Sync>;

#[derive(Default)]
pub struct QueueManager {
    connectors: RwLock<FxHashMap<String, ConnectorFactory>>,
}

impl fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueManager").field("drivers", &self.drivers()).finish()
    }
}

impl QueueManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the connector for `driver`.
    pub fn add_connector<F>(&self, driver: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Connector>, QueueError> + Send + Sync + 'static,
    {
        let driver = driver.into();
        debug!(driver = %driver, "Queue connector registered");
        self.connectors.write().insert(driver, Arc::new(factory));
    }

    #[must_use]
    pub fn has_connector(&self, driver: &str) -> bool {
        self.connectors.read().contains_key(driver)
    }

    /// Builds the connector registered for `driver`.
    ///
    /// # Errors
    /// Fails when no connector is registered or its factory fails.
    pub fn connector(&self, driver: &str) -> Result<Box<dyn Connector>, QueueError> {
        let factory = self.connectors.read().get(driver).cloned().ok_or_else(|| {
            QueueError::UnknownConnector { message: driver.to_owned().into(), context: None }
        })?;
        factory()
    }

    #[must_use]
    pub fn drivers(&self) -> Vec<String> {
        let mut drivers: Vec<String> = self.connectors.read().keys().cloned().collect();
        drivers.sort_unstable();
        drivers
    }
}

/// Runs jobs pulled from the queue manager's connections.
#[derive(Debug)]
pub struct QueueWorker {
    manager: Arc<QueueManager>,
}

impl QueueWorker {
    #[must_use]
    pub const fn new(manager: Arc<QueueManager>) -> Self {
        Self { manager }
    }

    #[must_use]
    pub fn manager(&self) -> &QueueManager {
        &self.manager
    }
}

/// Binds the queue manager and worker as singletons.
#[derive(Debug, Default)]
pub struct QueueServiceProvider;

impl ServiceProvider for QueueServiceProvider {
    fn name(&self) -> &'static str {
        "queue"
    }

    fn register(&self, app: &Application) -> Result<(), BoxError> {
        let container = app.container();
        container.singleton(keys::QUEUE, |_| Ok(QueueManager::new()));
        container.singleton(keys::QUEUE_WORKER, |c: &crate::container::Container| {
            c.resolve::<QueueManager>(keys::QUEUE).map(QueueWorker::new)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Connector for Fixed {
        fn connect(&self, connection: &str) -> Result<QueueConnection, QueueError> {
            Ok(QueueConnection {
                driver: "fixed".into(),
                connection: connection.into(),
                endpoint: "memory://".into(),
                prefix: None,
            })
        }
    }

    #[test]
    fn connectors_are_built_on_demand() {
        let manager = QueueManager::new();
        manager.add_connector("fixed", || Ok(Box::new(Fixed) as Box<dyn Connector>));

        let conn = manager.connector("fixed").unwrap().connect("default").unwrap();
        assert_eq!(conn.connection, "default");
        assert_eq!(manager.drivers(), vec!["fixed"]);
    }

    #[test]
    fn unknown_driver_fails() {
        let err = QueueManager::new().connector("sqs").err().unwrap();
        assert_eq!(err.kind(), "UnknownConnector");
    }
}
