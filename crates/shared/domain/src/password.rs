//! Credential hashing.
//!
//! Passwords are hashed with Argon2id. The cost factor maps to the Argon2
//! iteration count and is chosen per call; verification reads the salt and
//! parameters embedded in the PHC string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{DomainError, DomainResult};

/// One-way password hashing with a tunable work factor.
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with `cost` iterations and a fresh random salt.
    fn hash(&self, password: &str, cost: u32) -> DomainResult<String>;

    /// Check `password` against a stored hash. Mismatches and malformed
    /// hashes both yield `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id implementation of [`CredentialHasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }

    fn argon2(cost: u32) -> DomainResult<Argon2<'static>> {
        let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| DomainError::password(format!("Invalid cost factor {}: {}", cost, e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str, cost: u32) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2(cost)?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
