/*
 * Responsibility
 * - Load Config → build collaborators → assemble Router
 * - Apply HTTP middleware
 * - Start serving via axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::auth::JwtVerifier;
use crate::services::cache::ValkeyBalanceCache;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,balance_reader=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they don't get lost
        // (stderr can be hidden depending on how the process is launched).
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    // Fail fast on panics in development; keep serving in production.
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting balance reader in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let verifier = JwtVerifier::new(
        &config.access_jwt_public_key_pem,
        config.access_token_leeway_seconds,
    )?;

    let cache = ValkeyBalanceCache::new(&config.cache_url, &config.cache_key_prefix).await?;

    Ok(AppState::new(Arc::new(verifier), Arc::new(cache)))
}

fn build_router(state: AppState) -> Router {
    // v1 routes are mounted at the root: the balance path contract is
    // `/balances/{account_id}` with no version prefix.
    let router = Router::new().merge(api::v1::routes()).with_state(state);

    middleware::http::apply(router)
}
