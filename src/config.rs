// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Maximum failed logins before an email is locked out.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Lockout duration after too many failed logins (15 minutes).
pub const LOCKOUT_DURATION_SECS: u64 = 900;

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Sliding window for the per-identifier rate limiter (1 minute).
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Requests accepted per identifier within one rate-limit window.
pub const MAX_REQUESTS_PER_WINDOW: usize = 10;

/// Session lifetime: tokens expire this many seconds after login (1 hour).
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 3600;

/// Interval between rate-limiter sweep runs.
pub const RATE_LIMIT_SWEEP_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub session_timeout_secs: u64,
    pub rust_log: String,

    /// Artificial delay applied to every login/signup credential branch.
    pub auth_delay_ms: u64,

    /// Seed credentials for the default admin account.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,

    /// Seed the demo catalog when the listing collection is absent.
    pub seed_demo_listings: bool,

    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_from: Option<String>,

    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let session_timeout_secs = env::var("SESSION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TIMEOUT_SECS);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let auth_delay_ms = env::var("AUTH_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);

        Self {
            database_url,
            jwt_secret,
            session_timeout_secs,
            rust_log,
            auth_delay_ms,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            seed_demo_listings: env::var("SEED_DEMO_LISTINGS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port,
            smtp_username: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASS").ok(),
            email_from: env::var("EMAIL_FROM").ok(),
            razorpay_key_id: env::var("RAZORPAY_KEY_ID").ok(),
            razorpay_key_secret: env::var("RAZORPAY_KEY_SECRET").ok(),
        }
    }
}
