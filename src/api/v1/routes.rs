/*
 * Responsibility
 * - Define the URL structure
 * - /health (probe) and /balances/{account_id} (the read path)
 * - Authorization is per-account, so it lives in the balance handler
 *   rather than in a route_layer
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{balances::get_balance, health::health};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/balances/{account_id}", get(get_balance))
}
