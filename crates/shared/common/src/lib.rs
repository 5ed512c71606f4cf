//! Common utilities shared by the identity store and the auth service.
//!
//! This crate provides:
//! - Unified error taxonomy with HTTP mapping
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
