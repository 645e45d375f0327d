// src/state.rs

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use crate::config::{Config, MAX_REQUESTS_PER_WINDOW, RATE_LIMIT_WINDOW_SECS};
use crate::email::Mailer;
use crate::payments::RazorpayClient;
use crate::security::rate_limit::RateLimiter;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub rate_limiter: Arc<RateLimiter>,
    pub mailer: Arc<Mailer>,
    pub razorpay: Arc<RazorpayClient>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
            MAX_REQUESTS_PER_WINDOW,
        ));
        let mailer = Arc::new(Mailer::from_config(&config));
        let razorpay = Arc::new(RazorpayClient::from_config(&config));

        Self {
            store,
            config,
            rate_limiter,
            mailer,
            razorpay,
        }
    }
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<RateLimiter> {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}

impl FromRef<AppState> for Arc<Mailer> {
    fn from_ref(state: &AppState) -> Self {
        state.mailer.clone()
    }
}

impl FromRef<AppState> for Arc<RazorpayClient> {
    fn from_ref(state: &AppState) -> Self {
        state.razorpay.clone()
    }
}
