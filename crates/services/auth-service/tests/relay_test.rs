//! Relay tests against a mock template endpoint.

mod support;

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_service_lib::events::{EventBus, HttpTemplateSource};
use auth_service_lib::service::{AuthService, Authenticator, SignUpKind};
use auth_service_lib::session::InMemorySessionStore;
use common::{BrokerConfig, TemplateConfig};
use domain::{Argon2Hasher, VERIFICATION_SUBJECT};
use identity_store_lib::repository::InMemoryUserStore;
use support::{token_issuer, RecordingBroker};

const APP_HOST: &str = "https://vet.example.com";

struct Wiring {
    auth: Authenticator,
    broker: Arc<RecordingBroker>,
}

fn wire(server: &MockServer) -> Wiring {
    let broker = Arc::new(RecordingBroker::default());
    let templates = Arc::new(HttpTemplateSource::new(server.uri()));
    let template_config = TemplateConfig {
        host: server.uri(),
        prefix: "/veterinary-statics".to_string(),
        app_host: APP_HOST.to_string(),
    };

    let events = EventBus::with_relays(
        broker.clone(),
        templates.clone(),
        &BrokerConfig::default(),
        &template_config,
    );

    let auth = Authenticator::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(Argon2Hasher::new()),
        token_issuer(),
        templates,
        template_config,
        Arc::new(events),
    )
    .with_hash_cost(1);

    Wiring { auth, broker }
}

#[tokio::test]
async fn test_sign_up_relays_both_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/veterinary-statics/welcome-employee.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<a href=\"{{placeholder}}\">Verify</a>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let wiring = wire(&server);
    let token = wiring
        .auth
        .sign_up("org@x.com", "password123", SignUpKind::Employee)
        .await
        .unwrap();

    let created = wiring.broker.on_topic("user-created");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["email"], "org@x.com");
    assert_eq!(created[0]["type"], "Organization");
    assert_eq!(created[0]["roles"], serde_json::json!(["Employee"]));
    assert!(created[0]["userId"].is_string());

    let emails = wiring.broker.on_topic("send-email");
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0]["to"], "org@x.com");
    assert_eq!(emails[0]["subject"], VERIFICATION_SUBJECT);
    assert_eq!(
        emails[0]["body"],
        format!(
            "<a href=\"{}/api/v1/authentication/employee/verification/{}\">Verify</a>",
            APP_HOST, token
        )
    );
    assert_eq!(emails[0].as_object().unwrap().len(), 3);

    let topics: Vec<String> = wiring
        .broker
        .published()
        .into_iter()
        .map(|(topic, _)| topic)
        .collect();
    assert_eq!(topics, vec!["user-created", "send-email"]);
}

#[tokio::test]
async fn test_template_failure_suppresses_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/veterinary-statics/welcome-customer.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let wiring = wire(&server);
    let result = wiring
        .auth
        .sign_up("a@x.com", "password123", SignUpKind::Customer)
        .await;

    assert!(result.is_ok());
    assert!(wiring.broker.on_topic("send-email").is_empty());
    assert_eq!(wiring.broker.on_topic("user-created").len(), 1);
}

#[tokio::test]
async fn test_verification_page_served_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/veterinary-statics/welcome-customer.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{{placeholder}}"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/veterinary-statics/success-customer-verification.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Welcome aboard</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let wiring = wire(&server);
    let token = wiring
        .auth
        .sign_up("a@x.com", "password123", SignUpKind::Customer)
        .await
        .unwrap();

    assert_eq!(wiring.auth.verify(&token).await, "<h1>Welcome aboard</h1>");
    wiring.auth.sign_in("a@x.com", "password123").await.unwrap();
}
