//! Domain-level constants.
//!
//! These constants define business rules shared by the store adapters,
//! the authentication flows and the relays.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to self-registered customers
pub const ROLE_CUSTOMER: &str = "Customer";

/// Role assigned to accounts registered through the employee sign-up
pub const ROLE_EMPLOYEE: &str = "Employee";

/// Administrator role, held by the bootstrap account
pub const ROLE_ADMIN: &str = "Admin";

// =============================================================================
// Sessions
// =============================================================================

/// Prefix of every session key in the session store
pub const SESSION_KEY_PREFIX: &str = "jwt:";

/// Build the session key for an email address.
pub fn session_key(email: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, email)
}

// =============================================================================
// Authentication
// =============================================================================

/// Bearer token validity (2 days)
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 48;

/// Longest accepted bearer token validity (one year)
pub const MAX_TOKEN_VALIDITY_HOURS: i64 = 24 * 366;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Default Argon2 iteration count used when hashing passwords
pub const DEFAULT_HASH_COST: u32 = 2;

// =============================================================================
// Verification emails and templates
// =============================================================================

/// Subject of the verification email
pub const VERIFICATION_SUBJECT: &str = "¡Welcome!";

/// Placeholder replaced with the verification URL in welcome templates
pub const TEMPLATE_PLACEHOLDER: &str = "{{placeholder}}";

/// Welcome template for organization accounts
pub const TEMPLATE_WELCOME_EMPLOYEE: &str = "welcome-employee.html";

/// Welcome template for customer accounts
pub const TEMPLATE_WELCOME_CUSTOMER: &str = "welcome-customer.html";

/// Verification success page for organization accounts
pub const TEMPLATE_SUCCESS_EMPLOYEE: &str = "success-employee-verification.html";

/// Verification success page for customer accounts
pub const TEMPLATE_SUCCESS_CUSTOMER: &str = "success-customer-verification.html";

/// Page returned when verification cannot be completed
pub const VERIFICATION_FALLBACK_HTML: &str =
    "<html><body><h1>Something went wrong. Comunicate with support.</h1></body></html>";
