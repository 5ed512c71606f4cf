//! Domain events published by the authentication flows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::VERIFICATION_SUBJECT;
use crate::user::{User, UserType};

/// Event type routed through an in-process channel.
pub trait DomainEvent: Clone + Send + Sync + 'static {
    /// Name used in logs.
    const NAME: &'static str;
}

/// Emitted once per successful sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedEvent {
    pub user_id: Uuid,
    pub email: String,
    /// `Customer` or `Organization`
    #[serde(rename = "type")]
    pub account_type: String,
    pub roles: Vec<String>,
}

impl UserCreatedEvent {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            account_type: user.user_type.event_label().to_string(),
            roles: user.roles.clone(),
        }
    }
}

impl DomainEvent for UserCreatedEvent {
    const NAME: &'static str = "UserCreated";
}

/// Verification email request. `user_type` and `token` stay local: they
/// drive template selection and are never part of the broker payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVerificationEvent {
    pub to: String,
    pub subject: String,
    pub body: Option<String>,
    #[serde(skip)]
    pub user_type: UserType,
    #[serde(skip)]
    pub token: String,
}

impl UserVerificationEvent {
    /// Body-less event for a freshly registered user.
    pub fn for_user(user: &User) -> Self {
        Self {
            to: user.email.clone(),
            subject: VERIFICATION_SUBJECT.to_string(),
            body: None,
            user_type: user.user_type,
            token: user.verification_token.clone().unwrap_or_default(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl DomainEvent for UserVerificationEvent {
    const NAME: &'static str = "UserVerification";
}
