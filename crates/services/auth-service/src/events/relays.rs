//! Relays forwarding domain events to the broker.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::broker::EventBroker;
use super::channel::EventHandler;
use super::templates::TemplateSource;
use common::{AppError, AppResult, TemplateConfig};
use domain::{UserCreatedEvent, UserType, UserVerificationEvent, TEMPLATE_PLACEHOLDER};

/// Public link that completes the verification of an account.
pub fn verification_url(app_host: &str, user_type: UserType, token: &str) -> String {
    format!(
        "{}/api/v1/authentication/{}/verification/{}",
        app_host.trim_end_matches('/'),
        user_type.route_segment(),
        token
    )
}

fn to_payload<T: serde::Serialize>(event: &T) -> AppResult<String> {
    serde_json::to_string(event)
        .map_err(|e| AppError::internal(format!("Event serialization failed: {}", e)))
}

/// Forwards `UserCreated` to the account-created topic.
pub struct UserCreatedRelay {
    broker: Arc<dyn EventBroker>,
    topic: String,
}

impl UserCreatedRelay {
    pub fn new(broker: Arc<dyn EventBroker>, topic: impl Into<String>) -> Self {
        Self {
            broker,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl EventHandler<UserCreatedEvent> for UserCreatedRelay {
    async fn handle(&self, event: &UserCreatedEvent) -> AppResult<()> {
        let payload = to_payload(event)?;
        self.broker.publish(&self.topic, payload).await?;

        info!(user_id = %event.user_id, topic = %self.topic, "UserCreated relayed");
        Ok(())
    }
}

/// Fills the welcome template for the account type and forwards the
/// resulting email request to the verification topic.
pub struct UserVerificationRelay {
    templates: Arc<dyn TemplateSource>,
    broker: Arc<dyn EventBroker>,
    config: TemplateConfig,
    topic: String,
}

impl UserVerificationRelay {
    pub fn new(
        templates: Arc<dyn TemplateSource>,
        broker: Arc<dyn EventBroker>,
        config: TemplateConfig,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            broker,
            config,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl EventHandler<UserVerificationEvent> for UserVerificationRelay {
    async fn handle(&self, event: &UserVerificationEvent) -> AppResult<()> {
        let path = self.config.path_for(event.user_type.welcome_template());

        // No template, no email
        let template = match self.templates.fetch(&path).await {
            Ok(template) => template,
            Err(e) => {
                warn!(to = %event.to, error = %e, "Verification email dropped");
                return Ok(());
            }
        };

        let link = verification_url(&self.config.app_host, event.user_type, &event.token);
        let filled = event
            .clone()
            .with_body(template.replace(TEMPLATE_PLACEHOLDER, &link));

        let payload = to_payload(&filled)?;
        self.broker.publish(&self.topic, payload).await?;

        info!(to = %event.to, topic = %self.topic, "Verification email relayed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::broker::MockEventBroker;
    use crate::events::templates::MockTemplateSource;
    use domain::NewUser;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn verification_event(user: NewUser) -> UserVerificationEvent {
        UserVerificationEvent::for_user(
            &user
                .with_verification_token("tok-123")
                .into_user(Uuid::new_v4()),
        )
    }

    fn template_config() -> TemplateConfig {
        TemplateConfig {
            host: "http://statics".to_string(),
            prefix: "/veterinary-statics".to_string(),
            app_host: "https://app.example.com/".to_string(),
        }
    }

    #[test]
    fn test_verification_url_per_type() {
        assert_eq!(
            verification_url("https://app.example.com", UserType::Organization, "t"),
            "https://app.example.com/api/v1/authentication/employee/verification/t"
        );
        assert_eq!(
            verification_url("https://app.example.com/", UserType::Customer, "t"),
            "https://app.example.com/api/v1/authentication/customer/verification/t"
        );
    }

    #[tokio::test]
    async fn test_user_created_relay_publishes_payload() {
        let user = NewUser::employee("org@x.com", "hash").into_user(Uuid::new_v4());
        let event = UserCreatedEvent::from_user(&user);
        let expected = serde_json::to_string(&event).unwrap();

        let mut broker = MockEventBroker::new();
        broker
            .expect_publish()
            .with(eq("user-created"), eq(expected))
            .times(1)
            .returning(|_, _| Ok(()));

        let relay = UserCreatedRelay::new(Arc::new(broker), "user-created");
        relay.handle(&event).await.unwrap();
    }

    #[tokio::test]
    async fn test_user_created_relay_reports_broker_failure() {
        let user = NewUser::customer("a@x.com", "hash").into_user(Uuid::new_v4());

        let mut broker = MockEventBroker::new();
        broker
            .expect_publish()
            .returning(|_, _| Err(AppError::broker_unavailable("down")));

        let relay = UserCreatedRelay::new(Arc::new(broker), "user-created");
        let result = relay.handle(&UserCreatedEvent::from_user(&user)).await;
        assert!(matches!(result, Err(AppError::BrokerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_verification_relay_fills_employee_template() {
        let mut templates = MockTemplateSource::new();
        templates
            .expect_fetch()
            .with(eq("/veterinary-statics/welcome-employee.html"))
            .times(1)
            .returning(|_| Ok("<a href=\"{{placeholder}}\">verify</a>".to_string()));

        let mut broker = MockEventBroker::new();
        broker
            .expect_publish()
            .withf(|topic, payload| {
                let value: serde_json::Value = serde_json::from_str(payload).unwrap();
                topic == "send-email"
                    && value["to"] == "org@x.com"
                    && value["subject"] == domain::VERIFICATION_SUBJECT
                    && value["body"]
                        == "<a href=\"https://app.example.com/api/v1/authentication/employee/verification/tok-123\">verify</a>"
                    && value.get("token").is_none()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let relay = UserVerificationRelay::new(
            Arc::new(templates),
            Arc::new(broker),
            template_config(),
            "send-email",
        );

        relay
            .handle(&verification_event(NewUser::employee("org@x.com", "hash")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_verification_relay_skips_publish_without_template() {
        let mut templates = MockTemplateSource::new();
        templates
            .expect_fetch()
            .with(eq("/veterinary-statics/welcome-customer.html"))
            .times(1)
            .returning(|path| Err(AppError::TemplateUnavailable(path.to_string())));

        let mut broker = MockEventBroker::new();
        broker.expect_publish().never();

        let relay = UserVerificationRelay::new(
            Arc::new(templates),
            Arc::new(broker),
            template_config(),
            "send-email",
        );

        let result = relay
            .handle(&verification_event(NewUser::customer("a@x.com", "hash")))
            .await;
        assert!(result.is_ok());
    }
}
