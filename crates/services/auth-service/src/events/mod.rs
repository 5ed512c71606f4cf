//! Domain event fan-out and the broker relays.

mod broker;
mod channel;
mod relays;
mod templates;

use std::sync::Arc;

use common::{BrokerConfig, TemplateConfig};
use domain::{UserCreatedEvent, UserVerificationEvent};

pub use broker::{EventBroker, KafkaBroker};
pub use channel::{EventChannel, EventHandler};
pub use relays::{verification_url, UserCreatedRelay, UserVerificationRelay};
pub use templates::{HttpTemplateSource, TemplateSource};

#[cfg(any(test, feature = "test-utils"))]
pub use broker::MockEventBroker;
#[cfg(any(test, feature = "test-utils"))]
pub use templates::MockTemplateSource;

const USER_CREATED_RELAY: &str = "user-created-relay";
const USER_VERIFICATION_RELAY: &str = "user-verification-relay";

/// One channel per domain event type.
#[derive(Default)]
pub struct EventBus {
    pub user_created: EventChannel<UserCreatedEvent>,
    pub user_verification: EventChannel<UserVerificationEvent>,
}

impl EventBus {
    /// Bus without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus with both broker relays subscribed.
    pub fn with_relays(
        broker: Arc<dyn EventBroker>,
        templates: Arc<dyn TemplateSource>,
        broker_config: &BrokerConfig,
        template_config: &TemplateConfig,
    ) -> Self {
        let mut bus = Self::new();
        bus.user_created.subscribe(
            USER_CREATED_RELAY,
            Arc::new(UserCreatedRelay::new(
                broker.clone(),
                broker_config.user_created_topic.clone(),
            )),
        );
        bus.user_verification.subscribe(
            USER_VERIFICATION_RELAY,
            Arc::new(UserVerificationRelay::new(
                templates,
                broker,
                template_config.clone(),
                broker_config.user_verification_topic.clone(),
            )),
        );
        bus
    }
}
