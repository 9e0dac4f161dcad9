//! NeonMart - Self-hosted Storefront Backend

use std::sync::Arc;

use anyhow::Result;
use neonmart::api::{self, AppState};
use neonmart::auth::EnvCredentials;
use neonmart::checkout::CheckoutCoordinator;
use neonmart::config::Config;
use neonmart::store::catalog::starter_products;
use neonmart::store::{CartStore, OrderLedger, ProductCatalog};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::time::Duration as CookieDuration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Session cookie name.
const SESSION_COOKIE_NAME: &str = "neonmart_session";

/// How often idle carts are swept.
const SWEEP_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(ProductCatalog::with_products(starter_products()));
    let carts = Arc::new(CartStore::new(config.cart_ttl));
    let ledger = Arc::new(OrderLedger::new());
    let checkout = Arc::new(CheckoutCoordinator::new(
        catalog.clone(),
        carts.clone(),
        ledger.clone(),
    ));
    let credentials = Arc::new(EnvCredentials::new(
        config.admin_username.clone(),
        config.admin_password.clone(),
    ));

    // Evict idle carts in the background.
    let sweeper = carts.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            tick.tick().await;
            let evicted = sweeper.purge_idle();
            if evicted > 0 {
                tracing::debug!(evicted, "purged idle carts");
            }
        }
    });

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(CookieDuration::seconds(
            config.session_ttl.as_secs() as i64,
        )))
        .with_same_site(SameSite::Lax)
        .with_http_only(true);

    let state = AppState {
        catalog,
        carts,
        ledger,
        checkout,
        credentials,
    };
    let app = api::router(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!("NeonMart listening on {addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
