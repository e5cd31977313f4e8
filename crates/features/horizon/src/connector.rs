//! Queue connector routing jobs through the broker connection manager.

use hzn_kernel::broker::BrokerManager;
use hzn_kernel::queue::{Connector, QueueConnection, QueueError};
use std::sync::Arc;

/// Driver name the connector is registered under.
pub const DRIVER: &str = "redis";

#[derive(Debug, Clone)]
pub struct RedisConnector {
    broker: Arc<BrokerManager>,
}

impl RedisConnector {
    #[must_use]
    pub const fn new(broker: Arc<BrokerManager>) -> Self {
        Self { broker }
    }
}

impl Connector for RedisConnector {
    fn connect(&self, connection: &str) -> Result<QueueConnection, QueueError> {
        let settings = self.broker.connection(connection).ok_or_else(|| QueueError::Connection {
            message: format!("broker connection [{connection}] is not configured").into(),
            context: None,
        })?;

        Ok(QueueConnection {
            driver: DRIVER.to_owned(),
            connection: connection.to_owned(),
            endpoint: settings.url(),
            prefix: settings.prefix.clone(),
        })
    }
}
