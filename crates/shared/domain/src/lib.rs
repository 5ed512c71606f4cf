//! Domain layer - Core identity entities, filters, events and credential hashing.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Store adapters and relays in the service crates interpret these types.

pub mod constants;
pub mod error;
pub mod events;
pub mod filter;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use events::{DomainEvent, UserCreatedEvent, UserVerificationEvent};
pub use filter::{FieldUpdate, FieldValue, Filter, UserField};
pub use password::{Argon2Hasher, CredentialHasher};
pub use user::{NewUser, User, UserType};
