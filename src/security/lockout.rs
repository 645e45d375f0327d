//! Persisted per-email login-attempt tracking with lockout expiry.
//!
//! Independent of the in-memory rate limiter: these records survive process
//! restarts and gate only the credential check itself.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store::Store;

/// One record per email, absent until the first failed attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginAttemptRecord {
    pub count: u32,
    /// Epoch milliseconds of the most recent failed attempt.
    pub last_attempt_ms: i64,
}

/// Outcome of a lockout check.
#[derive(Debug, PartialEq, Eq)]
pub struct LockoutStatus {
    pub locked: bool,
    /// Minutes until the lockout expires, rounded up. Zero when not locked.
    pub remaining_minutes: u64,
}

fn attempts_key(email: &str) -> String {
    format!("login_attempts:{email}")
}

/// Checks whether `email` is currently locked out.
///
/// When the lockout window has elapsed, the check itself clears the stale
/// record (read-triggered reset), so the next attempt starts from zero.
pub async fn check_login_attempts(
    store: &Store,
    email: &str,
    max_attempts: u32,
    lockout: Duration,
) -> Result<LockoutStatus, AppError> {
    let key = attempts_key(email);
    let Some(record) = store.get::<LoginAttemptRecord>(&key).await? else {
        return Ok(LockoutStatus { locked: false, remaining_minutes: 0 });
    };

    if record.count >= max_attempts {
        let elapsed_ms = Utc::now().timestamp_millis() - record.last_attempt_ms;
        let lockout_ms = lockout.as_millis() as i64;

        if elapsed_ms < lockout_ms {
            let remaining_ms = (lockout_ms - elapsed_ms) as u64;
            return Ok(LockoutStatus {
                locked: true,
                remaining_minutes: remaining_ms.div_ceil(60_000),
            });
        }

        // Lockout expired: reset as a side effect of the check.
        store.remove(&key).await?;
    }

    Ok(LockoutStatus { locked: false, remaining_minutes: 0 })
}

/// Records the outcome of a login attempt.
///
/// Success clears the record entirely; failure increments the counter and
/// refreshes the attempt timestamp.
pub async fn record_login_attempt(
    store: &Store,
    email: &str,
    success: bool,
) -> Result<(), AppError> {
    let key = attempts_key(email);

    if success {
        store.remove(&key).await?;
        return Ok(());
    }

    let mut record = store
        .get::<LoginAttemptRecord>(&key)
        .await?
        .unwrap_or_default();
    record.count += 1;
    record.last_attempt_ms = Utc::now().timestamp_millis();
    store.put(&key, &record).await?;

    Ok(())
}
