//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ROLE_CUSTOMER, ROLE_EMPLOYEE, TEMPLATE_SUCCESS_CUSTOMER, TEMPLATE_SUCCESS_EMPLOYEE,
    TEMPLATE_WELCOME_CUSTOMER, TEMPLATE_WELCOME_EMPLOYEE,
};

const TYPE_CUSTOMER: &str = "customer";
const TYPE_ORGANIZATION: &str = "organization";

/// Account type. Selects the templates and verification route for a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Customer,
    Organization,
}

impl UserType {
    /// Stored representation (`customer` / `organization`).
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Customer => TYPE_CUSTOMER,
            UserType::Organization => TYPE_ORGANIZATION,
        }
    }

    /// Label carried by the `UserCreated` event (`Customer` / `Organization`).
    pub fn event_label(&self) -> &'static str {
        match self {
            UserType::Customer => "Customer",
            UserType::Organization => "Organization",
        }
    }

    /// Path segment of the verification route for this type.
    pub fn route_segment(&self) -> &'static str {
        match self {
            UserType::Customer => "customer",
            UserType::Organization => "employee",
        }
    }

    /// Welcome email template file.
    pub fn welcome_template(&self) -> &'static str {
        match self {
            UserType::Organization => TEMPLATE_WELCOME_EMPLOYEE,
            UserType::Customer => TEMPLATE_WELCOME_CUSTOMER,
        }
    }

    /// Verification success page file.
    pub fn success_template(&self) -> &'static str {
        match self {
            UserType::Organization => TEMPLATE_SUCCESS_EMPLOYEE,
            UserType::Customer => TEMPLATE_SUCCESS_CUSTOMER,
        }
    }
}

impl From<&str> for UserType {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(TYPE_ORGANIZATION) {
            UserType::Organization
        } else {
            UserType::Customer
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Vec<String>,
    pub verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Sign-in gate: verified and not locked.
    pub fn can_sign_in(&self) -> bool {
        self.verified && !self.blocked
    }

    /// Mark the account as verified.
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.updated_at = Utc::now();
    }

    /// Roles joined with `,` as carried in token claims.
    pub fn joined_roles(&self) -> String {
        self.roles.join(",")
    }
}

/// User record before the identity store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub user_type: UserType,
    pub blocked: bool,
}

impl NewUser {
    /// Unverified customer account with the default role.
    pub fn customer(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            roles: vec![ROLE_CUSTOMER.to_string()],
            verified: false,
            verification_token: None,
            user_type: UserType::Customer,
            blocked: false,
        }
    }

    /// Unverified organization account with the employee role.
    pub fn employee(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            roles: vec![ROLE_EMPLOYEE.to_string()],
            user_type: UserType::Organization,
            ..Self::customer(email, password_hash)
        }
    }

    /// Replace the roles. An empty list keeps the current roles.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        if !roles.is_empty() {
            self.roles = roles;
        }
        self
    }

    pub fn with_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    pub fn with_verification_token(mut self, token: impl Into<String>) -> Self {
        self.verification_token = Some(token.into());
        self
    }

    /// Materialize the record with a store-assigned id.
    pub fn into_user(self, id: Uuid) -> User {
        let now = Utc::now();
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            roles: self.roles,
            verified: self.verified,
            verification_token: self.verification_token,
            user_type: self.user_type,
            blocked: self.blocked,
            created_at: now,
            updated_at: now,
        }
    }
}
