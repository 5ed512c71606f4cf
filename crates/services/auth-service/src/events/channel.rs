//! In-process publish/subscribe.
//!
//! `publish` awaits every subscribed handler in registration order before it
//! returns. A handler error or panic is logged here and never reaches the
//! publisher.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error, warn};

use common::AppResult;
use domain::DomainEvent;

/// Subscriber for one event type.
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E) -> AppResult<()>;
}

struct Subscription<E: DomainEvent> {
    name: String,
    handler: Arc<dyn EventHandler<E>>,
}

/// Ordered handler list for a single event type.
pub struct EventChannel<E: DomainEvent> {
    subscriptions: Vec<Subscription<E>>,
}

impl<E: DomainEvent> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Register a handler. A handler already registered under `name` is
    /// replaced in place.
    pub fn subscribe(&mut self, name: impl Into<String>, handler: Arc<dyn EventHandler<E>>) {
        let name = name.into();
        match self.subscriptions.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.handler = handler,
            None => self.subscriptions.push(Subscription { name, handler }),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deliver the event to every handler.
    pub async fn publish(&self, event: &E) {
        debug!(
            event = E::NAME,
            subscribers = self.subscriptions.len(),
            "Publishing event"
        );

        for subscription in &self.subscriptions {
            let outcome = AssertUnwindSafe(subscription.handler.handle(event))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    event = E::NAME,
                    handler = %subscription.name,
                    error = %e,
                    "Event handler failed"
                ),
                Err(_) => error!(
                    event = E::NAME,
                    handler = %subscription.name,
                    "Event handler panicked"
                ),
            }
        }
    }
}

impl<E: DomainEvent> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Ping(u32);

    impl DomainEvent for Ping {
        const NAME: &'static str = "Ping";
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler<Ping> for Recorder {
        async fn handle(&self, event: &Ping) -> AppResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.0));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl EventHandler<Ping> for Failing {
        async fn handle(&self, _event: &Ping) -> AppResult<()> {
            Err(AppError::broker_unavailable("no brokers"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl EventHandler<Ping> for Panicking {
        async fn handle(&self, _event: &Ping) -> AppResult<()> {
            panic!("handler blew up");
        }
    }

    fn recorder(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Recorder> {
        Arc::new(Recorder {
            label,
            log: log.clone(),
        })
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe("first", recorder("first", &log));
        channel.subscribe("second", recorder("second", &log));

        channel.publish(&Ping(7)).await;

        assert_eq!(*log.lock().unwrap(), vec!["first:7", "second:7"]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe("failing", Arc::new(Failing));
        channel.subscribe("panicking", Arc::new(Panicking));
        channel.subscribe("recorder", recorder("recorder", &log));

        channel.publish(&Ping(1)).await;

        assert_eq!(*log.lock().unwrap(), vec!["recorder:1"]);
    }

    #[tokio::test]
    async fn test_same_name_replaces_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe("relay", recorder("old", &log));
        channel.subscribe("relay", recorder("new", &log));
        assert_eq!(channel.subscriber_count(), 1);

        channel.publish(&Ping(2)).await;

        assert_eq!(*log.lock().unwrap(), vec!["new:2"]);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let channel: EventChannel<Ping> = EventChannel::default();
        channel.publish(&Ping(3)).await;
        assert_eq!(channel.subscriber_count(), 0);
    }
}
