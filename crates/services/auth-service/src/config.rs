//! Auth service configuration.

use std::env;
use std::str::FromStr;

use common::{
    AppError, AppResult, BootstrapConfig, BrokerConfig, CacheConfig, DatabaseConfig, JwtConfig,
    TemplateConfig,
};
use domain::{DEFAULT_HASH_COST, MAX_TOKEN_VALIDITY_HOURS};

const SECONDS_PER_HOUR: u64 = 3600;

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Token signing (secret redacted in debug output)
    pub jwt: JwtConfig,
    /// Identity store
    pub database: DatabaseConfig,
    /// Session store
    pub cache: CacheConfig,
    /// Event broker producer
    pub broker: BrokerConfig,
    /// Template endpoint and public host
    pub templates: TemplateConfig,
    /// Administrative account created at startup
    pub bootstrap: BootstrapConfig,
    /// Argon2 iterations used when hashing passwords
    pub hash_cost: u32,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Identity store settings only; used by the migration commands.
    pub fn database_from_env() -> DatabaseConfig {
        Self::database_from_lookup(&|key| env::var(key).ok())
    }

    fn database_from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> DatabaseConfig {
        let name = lookup("DEFAULT_DB").filter(|s| !s.is_empty());
        match lookup("DATABASE_URL").or_else(|| lookup("MONGODB_URI")) {
            // A configured URL brings its own database unless DEFAULT_DB names one
            Some(url) => DatabaseConfig { url, name },
            None => {
                let defaults = DatabaseConfig::default();
                DatabaseConfig {
                    url: defaults.url,
                    name: name.or(defaults.name),
                }
            }
        }
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |primary: &str, fallback: &str| lookup(primary).or_else(|| lookup(fallback));

        let secret = var("JWT_SECRET_KEY", "JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("JWT_SECRET_KEY must be set"))?;

        let defaults = Self::default();

        let expiration_hours = parsed(&lookup, "JWT_EXPIRATION_HOURS")?
            .unwrap_or(defaults.jwt.expiration_hours);
        if !(1..=MAX_TOKEN_VALIDITY_HOURS).contains(&expiration_hours) {
            return Err(AppError::validation(format!(
                "JWT_EXPIRATION_HOURS must be between 1 and {}",
                MAX_TOKEN_VALIDITY_HOURS
            )));
        }

        let hash_cost = parsed(&lookup, "PASSWORD_HASH_COST")?.unwrap_or(defaults.hash_cost);
        if hash_cost < 1 {
            return Err(AppError::validation("PASSWORD_HASH_COST must be at least 1"));
        }

        Ok(Self {
            jwt: JwtConfig {
                secret,
                expiration_hours,
            },
            database: Self::database_from_lookup(&lookup),
            cache: CacheConfig {
                url: var("REDIS_URI", "REDIS_URL").unwrap_or(defaults.cache.url),
            },
            broker: BrokerConfig {
                bootstrap_servers: lookup("BOOTSTRAP_SERVERS")
                    .unwrap_or(defaults.broker.bootstrap_servers),
                client_id: lookup("CLIENT_ID").unwrap_or(defaults.broker.client_id),
                user_created_topic: lookup("USER_CREATED_TOPIC")
                    .unwrap_or(defaults.broker.user_created_topic),
                user_verification_topic: lookup("USER_VERIFICATION_TOPIC")
                    .unwrap_or(defaults.broker.user_verification_topic),
            },
            templates: TemplateConfig {
                host: lookup("TEMPLATE_HOST").unwrap_or(defaults.templates.host),
                prefix: lookup("TEMPLATE_PREFIX").unwrap_or(defaults.templates.prefix),
                app_host: lookup("APP_HOST").unwrap_or(defaults.templates.app_host),
            },
            bootstrap: BootstrapConfig {
                admin_email: lookup("SUPER_USER").filter(|s| !s.is_empty()),
                admin_password: lookup("SUPER_USER_PASSWORD").filter(|s| !s.is_empty()),
            },
            hash_cost,
            host: lookup("AUTH_SERVICE_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "AUTH_SERVICE_PORT")?.unwrap_or(defaults.port),
        })
    }

    /// Session lifetime, equal to the token lifetime.
    pub fn session_ttl_seconds(&self) -> u64 {
        self.jwt.expiration_hours.max(0) as u64 * SECONDS_PER_HOUR
    }
}

/// Parse an optional numeric variable; a present but malformed value is an error.
fn parsed<T, F>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::validation(format!("{} is not a valid number", key)))
        })
        .transpose()
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            broker: BrokerConfig::default(),
            templates: TemplateConfig::default(),
            bootstrap: BootstrapConfig::default(),
            hash_cost: DEFAULT_HASH_COST,
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}
