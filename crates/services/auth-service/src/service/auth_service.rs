//! Authentication service - sign-up, sign-in, sign-out, email verification
//! and account locking.
//!
//! All state lives in the identity store and the session store; the service
//! itself holds none between calls.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{EventBus, TemplateSource};
use crate::service::token::TokenIssuer;
use crate::session::SessionStore;
use common::{AppError, AppResult, OptionExt, TemplateConfig};
use domain::{
    session_key, CredentialHasher, FieldUpdate, Filter, NewUser, UserCreatedEvent,
    UserVerificationEvent, DEFAULT_HASH_COST, VERIFICATION_FALLBACK_HTML,
};
use identity_store_lib::UserRepository;

/// Account flavor chosen at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpKind {
    /// Role `Customer`, type `customer`
    Customer,
    /// Role `Employee`, type `organization`
    Employee,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register an unverified account and return its verification token
    async fn sign_up(&self, email: &str, password: &str, kind: SignUpKind) -> AppResult<String>;

    /// Check credentials and open a session
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<String>;

    /// Close the session of `email`, if any
    async fn sign_out(&self, email: &str) -> AppResult<()>;

    /// Verify the account holding `token`; returns the page to show
    async fn verify(&self, token: &str) -> String;

    /// Toggle the lock of every listed account
    async fn switch_locked(&self, emails: &[String]) -> AppResult<()>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: TokenIssuer,
    templates: Arc<dyn TemplateSource>,
    template_config: TemplateConfig,
    events: Arc<EventBus>,
    hash_cost: u32,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: TokenIssuer,
        templates: Arc<dyn TemplateSource>,
        template_config: TemplateConfig,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            tokens,
            templates,
            template_config,
            events,
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// Argon2 iterations for new password hashes.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    async fn try_verify(&self, token: &str) -> AppResult<String> {
        let mut user = self
            .users
            .get(Filter::by_verification_token(token))
            .await?
            .ok_or_not_found()?;

        let page = self
            .templates
            .fetch(&self.template_config.path_for(user.user_type.success_template()))
            .await?;

        if !user.verified {
            user.mark_verified();
            let id = user.id;
            self.users.update_by_id(id, user).await?;
            info!(user_id = %id, "Account verified");
        }

        Ok(page)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn sign_up(&self, email: &str, password: &str, kind: SignUpKind) -> AppResult<String> {
        let password_hash = self.hasher.hash(password, self.hash_cost)?;

        let new_user = match kind {
            SignUpKind::Customer => NewUser::customer(email, password_hash),
            SignUpKind::Employee => NewUser::employee(email, password_hash),
        };
        let token = self.tokens.issue_for_registration(&new_user)?;
        let user = self
            .users
            .create(new_user.with_verification_token(token.clone()))
            .await?;

        info!(user_id = %user.id, user_type = %user.user_type, "User registered");

        self.events
            .user_created
            .publish(&UserCreatedEvent::from_user(&user))
            .await;
        self.events
            .user_verification
            .publish(&UserVerificationEvent::for_user(&user))
            .await;

        Ok(token)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .users
            .get(Filter::by_email(email))
            .await?
            .ok_or_not_found()?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AppError::NotFound);
        }
        if !user.can_sign_in() {
            debug!(
                user_id = %user.id,
                verified = user.verified,
                blocked = user.blocked,
                "Sign-in refused"
            );
            return Err(AppError::Unauthorized);
        }

        let token = self.tokens.issue(&user)?;
        self.sessions.set(&session_key(&user.email), &token).await?;

        info!(user_id = %user.id, "User signed in");
        Ok(token)
    }

    async fn sign_out(&self, email: &str) -> AppResult<()> {
        self.sessions.delete_one(&session_key(email)).await
    }

    async fn verify(&self, token: &str) -> String {
        match self.try_verify(token).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Verification not completed");
                VERIFICATION_FALLBACK_HTML.to_string()
            }
        }
    }

    async fn switch_locked(&self, emails: &[String]) -> AppResult<()> {
        let first = emails
            .first()
            .ok_or_else(|| AppError::bad_request("emails cannot be empty"))?;

        let reference = self
            .users
            .get(Filter::by_email(first))
            .await?
            .ok_or_not_found()?;
        let blocked = !reference.blocked;

        self.users
            .update_many(Filter::email_in(emails), FieldUpdate::blocked(blocked))
            .await?;

        let keys: Vec<String> = emails.iter().map(|email| session_key(email)).collect();
        self.sessions.delete_many(&keys).await?;

        info!(accounts = emails.len(), blocked, "Account lock switched");
        Ok(())
    }
}
