//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use auth_service_lib::events::{EventBroker, EventBus, EventHandler, TemplateSource};
use auth_service_lib::service::{Authenticator, TokenIssuer};
use auth_service_lib::session::{InMemorySessionStore, SessionStore};
use common::{AppError, AppResult, JwtConfig, TemplateConfig};
use domain::{
    session_key, Argon2Hasher, DomainEvent, UserCreatedEvent, UserVerificationEvent,
};
use identity_store_lib::repository::InMemoryUserStore;

pub const SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const SUCCESS_PAGE: &str = "<html><body>verified</body></html>";

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(&JwtConfig {
        secret: SECRET.to_string(),
        expiration_hours: 48,
    })
    .unwrap()
}

/// Template source serving fixed pages by path, counting fetches.
#[derive(Default)]
pub struct StaticTemplates {
    pages: HashMap<String, String>,
    fetches: Mutex<Vec<String>>,
}

impl StaticTemplates {
    pub fn with_page(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(path.to_string(), body.to_string());
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl TemplateSource for StaticTemplates {
    async fn fetch(&self, path: &str) -> AppResult<String> {
        self.fetches.lock().unwrap().push(path.to_string());
        self.pages
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::TemplateUnavailable(path.to_string()))
    }
}

/// Broker recording every publish.
#[derive(Default)]
pub struct RecordingBroker {
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingBroker {
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn on_topic(&self, topic: &str) -> Vec<serde_json::Value> {
        self.published()
            .into_iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| serde_json::from_str(&payload).unwrap())
            .collect()
    }
}

#[async_trait]
impl EventBroker for RecordingBroker {
    async fn publish(&self, topic: &str, payload: String) -> AppResult<()> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

/// Channel subscriber keeping a copy of every event.
pub struct Recorder<E> {
    events: Mutex<Vec<E>>,
}

impl<E: Clone> Recorder<E> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<E> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl<E: DomainEvent> EventHandler<E> for Recorder<E> {
    async fn handle(&self, event: &E) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Authenticator wired to in-memory stores and recording subscribers.
pub struct Harness {
    pub auth: Authenticator,
    pub users: Arc<InMemoryUserStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub templates: Arc<StaticTemplates>,
    pub created: Arc<Recorder<UserCreatedEvent>>,
    pub verifications: Arc<Recorder<UserVerificationEvent>>,
}

impl Harness {
    pub fn new() -> Self {
        let templates = StaticTemplates::default()
            .with_page("/veterinary-statics/success-customer-verification.html", SUCCESS_PAGE)
            .with_page("/veterinary-statics/success-employee-verification.html", SUCCESS_PAGE);
        Self::with_templates(templates)
    }

    pub fn with_templates(templates: StaticTemplates) -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let templates = Arc::new(templates);
        let created = Recorder::new();
        let verifications = Recorder::new();

        let mut bus = EventBus::new();
        bus.user_created.subscribe("recorder", created.clone());
        bus.user_verification
            .subscribe("recorder", verifications.clone());

        let auth = Authenticator::new(
            users.clone(),
            sessions.clone(),
            Arc::new(Argon2Hasher::new()),
            token_issuer(),
            templates.clone(),
            TemplateConfig::default(),
            Arc::new(bus),
        )
        .with_hash_cost(1);

        Self {
            auth,
            users,
            sessions,
            templates,
            created,
            verifications,
        }
    }

    /// Token stored for the session of `email`.
    pub async fn session_token(&self, email: &str) -> Option<String> {
        self.sessions.get(&session_key(email)).await.unwrap()
    }
}
