// src/store/repo.rs

//! Typed per-collection accessors over the key-value store.

use crate::error::AppError;
use crate::models::{listing::Listing, payment::PaymentRecord, user::User};

use super::Store;

/// Authoritative user directory.
pub const USERS: &str = "users";

/// Denormalized mirror of not-yet-approved users, maintained alongside the
/// directory. The two can drift under writers in other processes; that is an
/// accepted property of the store, not corruption.
pub const PENDING_USERS: &str = "pending_users";

/// Marketplace listing catalog.
pub const LISTINGS: &str = "listings";

/// Append-only payment ledger.
pub const PAYMENTS: &str = "payments";

pub fn banner_key(user_id: &str) -> String {
    format!("banner_dismissed:{user_id}")
}

impl Store {
    pub async fn users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.get(USERS).await?.unwrap_or_default())
    }

    pub async fn update_users<R>(
        &self,
        f: impl FnOnce(&mut Vec<User>) -> R,
    ) -> Result<R, AppError> {
        self.update(USERS, Vec::new, f).await
    }

    pub async fn pending_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.get(PENDING_USERS).await?.unwrap_or_default())
    }

    pub async fn update_pending_users<R>(
        &self,
        f: impl FnOnce(&mut Vec<User>) -> R,
    ) -> Result<R, AppError> {
        self.update(PENDING_USERS, Vec::new, f).await
    }

    pub async fn listings(&self) -> Result<Vec<Listing>, AppError> {
        Ok(self.get(LISTINGS).await?.unwrap_or_default())
    }

    pub async fn update_listings<R>(
        &self,
        f: impl FnOnce(&mut Vec<Listing>) -> R,
    ) -> Result<R, AppError> {
        self.update(LISTINGS, Vec::new, f).await
    }

    pub async fn payments(&self) -> Result<Vec<PaymentRecord>, AppError> {
        Ok(self.get(PAYMENTS).await?.unwrap_or_default())
    }

    /// The ledger is append-only; this is the only mutation it supports.
    pub async fn append_payment(&self, record: PaymentRecord) -> Result<(), AppError> {
        self.update(PAYMENTS, Vec::new, |ledger: &mut Vec<PaymentRecord>| {
            ledger.push(record)
        })
        .await
    }

    pub async fn banner_dismissed(&self, user_id: &str) -> Result<bool, AppError> {
        Ok(self.get(&banner_key(user_id)).await?.unwrap_or(false))
    }

    pub async fn set_banner_dismissed(&self, user_id: &str) -> Result<(), AppError> {
        self.put(&banner_key(user_id), &true).await
    }
}
