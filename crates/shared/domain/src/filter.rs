//! Store-agnostic user predicates and single-field updates.
//!
//! Each identity store adapter interprets these into its native query form.
//! `matches` and `apply` give the reference in-memory semantics.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::user::{User, UserType};

/// Queryable user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    Email,
    VerificationToken,
    Type,
    Verified,
    Blocked,
}

impl UserField {
    pub fn name(&self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Email => "email",
            UserField::VerificationToken => "verification_token",
            UserField::Type => "type",
            UserField::Verified => "verified",
            UserField::Blocked => "blocked",
        }
    }

    /// Current value of this field on `user`, `None` when unset.
    pub fn value_of(&self, user: &User) -> Option<FieldValue> {
        match self {
            UserField::Id => Some(FieldValue::Id(user.id)),
            UserField::Email => Some(FieldValue::Text(user.email.clone())),
            UserField::VerificationToken => user.verification_token.clone().map(FieldValue::Text),
            UserField::Type => Some(FieldValue::Text(user.user_type.as_str().to_string())),
            UserField::Verified => Some(FieldValue::Bool(user.verified)),
            UserField::Blocked => Some(FieldValue::Bool(user.blocked)),
        }
    }

    fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (UserField::Id, FieldValue::Id(_))
                | (UserField::Email, FieldValue::Text(_))
                | (UserField::VerificationToken, FieldValue::Text(_))
                | (UserField::Type, FieldValue::Text(_))
                | (UserField::Verified, FieldValue::Bool(_))
                | (UserField::Blocked, FieldValue::Bool(_))
        )
    }
}

/// Scalar value compared against or written to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Id(Uuid),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Id(value)
    }
}

/// Predicate over user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Field equals value
    Eq(UserField, FieldValue),
    /// Field equals any of the values
    In(UserField, Vec<FieldValue>),
    /// Matches every record
    Empty,
}

impl Filter {
    pub fn eq(field: UserField, value: impl Into<FieldValue>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn by_id(id: Uuid) -> Self {
        Filter::eq(UserField::Id, id)
    }

    pub fn by_email(email: &str) -> Self {
        Filter::eq(UserField::Email, email)
    }

    pub fn by_verification_token(token: &str) -> Self {
        Filter::eq(UserField::VerificationToken, token)
    }

    pub fn email_in<S: AsRef<str>>(emails: &[S]) -> Self {
        Filter::In(
            UserField::Email,
            emails.iter().map(|e| FieldValue::from(e.as_ref())).collect(),
        )
    }

    /// `In` over an empty list. Adapters may skip the round trip.
    pub fn matches_nothing(&self) -> bool {
        matches!(self, Filter::In(_, values) if values.is_empty())
    }

    pub fn matches(&self, user: &User) -> bool {
        match self {
            Filter::Empty => true,
            Filter::Eq(field, value) => field.value_of(user).as_ref() == Some(value),
            Filter::In(field, values) => field
                .value_of(user)
                .map(|current| values.contains(&current))
                .unwrap_or(false),
        }
    }
}

/// Assignment of one field across every matching record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: UserField,
    pub value: FieldValue,
}

impl FieldUpdate {
    /// Checked constructor. The id is immutable and values must fit the field.
    pub fn new(field: UserField, value: impl Into<FieldValue>) -> DomainResult<Self> {
        let value = value.into();
        if field == UserField::Id {
            return Err(DomainError::ImmutableField(field.name()));
        }
        if !field.accepts(&value) {
            return Err(DomainError::validation(format!(
                "value {:?} does not fit field {}",
                value,
                field.name()
            )));
        }
        Ok(Self { field, value })
    }

    pub fn blocked(value: bool) -> Self {
        Self {
            field: UserField::Blocked,
            value: FieldValue::Bool(value),
        }
    }

    pub fn verified(value: bool) -> Self {
        Self {
            field: UserField::Verified,
            value: FieldValue::Bool(value),
        }
    }

    /// Write the value into `user` and bump `updated_at`.
    pub fn apply(&self, user: &mut User) -> DomainResult<()> {
        match (&self.field, &self.value) {
            (UserField::Email, FieldValue::Text(v)) => user.email = v.clone(),
            (UserField::VerificationToken, FieldValue::Text(v)) => {
                user.verification_token = Some(v.clone())
            }
            (UserField::Type, FieldValue::Text(v)) => user.user_type = UserType::from(v.as_str()),
            (UserField::Verified, FieldValue::Bool(v)) => user.verified = *v,
            (UserField::Blocked, FieldValue::Bool(v)) => user.blocked = *v,
            (UserField::Id, _) => return Err(DomainError::ImmutableField(self.field.name())),
            (field, value) => {
                return Err(DomainError::validation(format!(
                    "value {:?} does not fit field {}",
                    value,
                    field.name()
                )))
            }
        }
        user.updated_at = Utc::now();
        Ok(())
    }
}
