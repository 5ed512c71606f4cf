//! Bearer token issuing.
//!
//! Tokens are HS256-signed and carry the claim names the downstream
//! validation middleware reads (`email`, `role`, `nameid`). Validation only
//! checks the signature and the time window; issuer and audience are not used.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult, JwtConfig};
use domain::{NewUser, User, MAX_TOKEN_VALIDITY_HOURS, MIN_JWT_SECRET_LENGTH};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    /// Roles joined with `,`
    pub role: String,
    /// Subject id, absent on registration tokens
    #[serde(rename = "nameid", default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    pub nbf: i64,
    pub exp: i64,
    pub iat: i64,
}

/// Signs and decodes bearer tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenIssuer {
    /// Build an issuer from the JWT configuration. The secret must be at
    /// least `MIN_JWT_SECRET_LENGTH` bytes.
    pub fn new(config: &JwtConfig) -> AppResult<Self> {
        if config.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        let validity = Some(config.expiration_hours)
            .filter(|hours| (1..=MAX_TOKEN_VALIDITY_HOURS).contains(hours))
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "JWT expiration must be between 1 and {} hours",
                    MAX_TOKEN_VALIDITY_HOURS
                ))
            })?;

        let secret = config.secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
        })
    }

    /// Token lifetime in seconds.
    pub fn validity_seconds(&self) -> u64 {
        self.validity.num_seconds().max(0) as u64
    }

    /// Token for a stored user.
    pub fn issue(&self, user: &User) -> AppResult<String> {
        self.sign(&user.email, user.joined_roles(), Some(user.id.to_string()))
    }

    /// Token for a user not yet persisted. Used as the verification key.
    pub fn issue_for_registration(&self, user: &NewUser) -> AppResult<String> {
        self.sign(&user.email, user.roles.join(","), None)
    }

    /// Decode and validate a token (signature and expiry only).
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    fn sign(&self, email: &str, role: String, subject_id: Option<String>) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            role,
            subject_id,
            nbf: now.timestamp(),
            exp: (now + self.validity).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("validity_hours", &self.validity.num_hours())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ROLE_ADMIN;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 48,
        })
        .unwrap()
    }

    #[test]
    fn test_short_secret_is_rejected_without_echo() {
        let result = TokenIssuer::new(&JwtConfig {
            secret: "tiny-secret".to_string(),
            expiration_hours: 48,
        });
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!err.to_string().contains("tiny-secret"));
    }

    #[test]
    fn test_unbounded_expiry_is_rejected() {
        for hours in [0, -1, MAX_TOKEN_VALIDITY_HOURS + 1, i64::MAX] {
            let result = TokenIssuer::new(&JwtConfig {
                secret: SECRET.to_string(),
                expiration_hours: hours,
            });
            assert!(matches!(result, Err(AppError::Validation(_))), "{}", hours);
        }
    }

    #[test]
    fn test_issue_carries_identity_claims() {
        let user = NewUser::customer("a@x.com", "hash")
            .with_roles(["Customer", ROLE_ADMIN])
            .into_user(Uuid::new_v4());

        let tokens = issuer();
        let claims = tokens.decode(&tokens.issue(&user).unwrap()).unwrap();

        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, "Customer,Admin");
        assert_eq!(claims.subject_id, Some(user.id.to_string()));
        assert_eq!(claims.exp - claims.iat, 48 * 3600);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_registration_token_has_no_subject() {
        let tokens = issuer();
        let token = tokens
            .issue_for_registration(&NewUser::employee("org@x.com", "hash"))
            .unwrap();

        let claims = tokens.decode(&token).unwrap();
        assert_eq!(claims.role, "Employee");
        assert!(claims.subject_id.is_none());
    }

    #[test]
    fn test_decode_rejects_foreign_secret() {
        let other = TokenIssuer::new(&JwtConfig {
            secret: "another-secret-key-for-testing-32chars".to_string(),
            expiration_hours: 48,
        })
        .unwrap();
        let user = NewUser::customer("a@x.com", "hash").into_user(Uuid::new_v4());

        let result = issuer().decode(&other.issue(&user).unwrap());
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let tokens = issuer();
        let past = Utc::now().timestamp() - 10 * 3600;
        let claims = Claims {
            email: "a@x.com".to_string(),
            role: "Customer".to_string(),
            subject_id: None,
            nbf: past - 3600,
            exp: past,
            iat: past - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding_key).unwrap();

        assert!(matches!(tokens.decode(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", issuer()).contains(SECRET));
    }
}
