/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Collaborators are injected at construction, never reached as globals
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;
use crate::services::cache::BalanceCache;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub cache: Arc<dyn BalanceCache>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, cache: Arc<dyn BalanceCache>) -> Self {
        Self { verifier, cache }
    }
}
