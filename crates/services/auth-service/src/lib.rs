//! Auth Service Library
//!
//! Credential and session handling for customer, employee and admin
//! accounts: sign-up with email verification, sign-in/out backed by a
//! session store, account locking, and broker relays for onboarding events.

pub mod bootstrap;
pub mod config;
pub mod events;
pub mod http;
pub mod service;
pub mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use domain::Argon2Hasher;
use identity_store_lib::{Database, UserStore};

use crate::config::AuthServiceConfig;
use crate::events::{EventBus, HttpTemplateSource, KafkaBroker};
use crate::http::{create_router, AppState};
use crate::service::{Authenticator, TokenIssuer};
use crate::session::RedisSessionStore;

/// Build every component and serve until shutdown.
pub async fn run_server_with_config(
    host: &str,
    port: u16,
    config: AuthServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = TokenIssuer::new(&config.jwt)?;

    // Identity store (migrations run on connect)
    let db = Database::connect(&config.database).await?;
    let users = Arc::new(UserStore::new(db.get_connection()));
    let hasher = Arc::new(Argon2Hasher::new());

    // Admin account exists before the first request is served
    let outcome =
        bootstrap::ensure_admin(users.as_ref(), hasher.as_ref(), &config.bootstrap, config.hash_cost)
            .await?;
    info!(?outcome, "Bootstrap finished");

    let sessions =
        Arc::new(RedisSessionStore::connect(&config.cache.url, config.session_ttl_seconds()).await?);

    let broker = Arc::new(KafkaBroker::new(&config.broker)?);
    let templates = Arc::new(HttpTemplateSource::new(config.templates.host.clone()));
    let events = Arc::new(EventBus::with_relays(
        broker,
        templates.clone(),
        &config.broker,
        &config.templates,
    ));

    let auth = Arc::new(
        Authenticator::new(
            users,
            sessions,
            hasher,
            tokens,
            templates,
            config.templates.clone(),
            events,
        )
        .with_hash_cost(config.hash_cost),
    );

    let app = create_router(AppState::new(auth)).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Auth service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
