//! Event broker producer.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use tracing::{debug, info};

use common::{AppError, AppResult, BrokerConfig};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Topic-based message sink.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventBroker: Send + Sync {
    /// Publish a JSON payload to `topic`
    async fn publish(&self, topic: &str, payload: String) -> AppResult<()>;
}

/// Kafka producer.
#[derive(Clone)]
pub struct KafkaBroker {
    producer: FutureProducer,
}

impl KafkaBroker {
    pub fn new(config: &BrokerConfig) -> AppResult<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.bootstrap_servers)
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", "5000")
            .create()?;

        info!(
            brokers = %config.bootstrap_servers,
            client_id = %config.client_id,
            "Event broker producer initialized"
        );

        Ok(Self { producer })
    }
}

#[async_trait]
impl EventBroker for KafkaBroker {
    async fn publish(&self, topic: &str, payload: String) -> AppResult<()> {
        let record = FutureRecord::<(), str>::to(topic).payload(payload.as_str());

        match self.producer.send(record, DELIVERY_TIMEOUT).await {
            Ok((partition, offset)) => {
                debug!(topic, partition, offset, "Event published");
                Ok(())
            }
            Err((e, _)) => Err(AppError::from(e)),
        }
    }
}
