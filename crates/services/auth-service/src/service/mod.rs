//! Authentication service business logic.

mod auth_service;
mod token;

pub use auth_service::{AuthService, Authenticator, SignUpKind};
pub use token::{Claims, TokenIssuer};
