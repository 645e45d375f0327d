// src/seed.rs

//! First-run seeding: the default admin account and the demo catalog.

use crate::config::Config;
use crate::error::AppError;
use crate::models::listing::demo_listings;
use crate::models::user::{Role, User};
use crate::store::{Store, repo::LISTINGS};
use crate::utils::hash::hash_password;

/// Seeds a pre-approved admin account when the directory holds none.
/// Exactly one admin exists by default; a second is never seeded.
pub async fn seed_default_admin(store: &Store, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let password_hash = hash_password(password)?;

    let seeded = store
        .update_users(|users| {
            if users.iter().any(|u| u.role == Role::Admin) {
                return false;
            }

            let mut admin = User::new(
                "Marketplace Admin".to_string(),
                email.clone(),
                password_hash,
                Role::Admin,
            );
            admin.approved = true;
            admin.email_verified = true;
            users.push(admin);
            true
        })
        .await?;

    if seeded {
        tracing::info!(email = %email, "Seeded default admin account");
    }

    Ok(())
}

/// Seeds the demo catalog on first run, when the listing collection is
/// absent. An existing (even empty) catalog is left alone.
pub async fn seed_demo_catalog(store: &Store) -> Result<(), AppError> {
    use crate::models::listing::Listing;

    let existing: Option<Vec<Listing>> = store.get(LISTINGS).await?;
    if existing.is_some() {
        return Ok(());
    }

    let demo = demo_listings();
    tracing::info!(count = demo.len(), "Seeding demo listing catalog");
    store.put(LISTINGS, &demo).await
}
