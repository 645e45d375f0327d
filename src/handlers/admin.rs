// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{listing::Listing, user::UserView},
    store::Store,
    utils::jwt::Claims,
};

/// Dashboard aggregates, recomputed from the live collections on every call.
/// Nothing here is cached, so the numbers can never go stale.
pub async fn stats(State(store): State<Store>) -> Result<impl IntoResponse, AppError> {
    let users = store.users().await?;
    let pending_users = store.pending_users().await?;
    let listings = store.listings().await?;

    Ok(Json(json!({
        "pending_users": pending_users.len(),
        "pending_listings": listings.iter().filter(|l| !l.approved).count(),
        "verified_users": users.iter().filter(|u| u.approved).count(),
        "flagged_items": 0,
    })))
}

/// Accounts awaiting approval, from the pending mirror.
pub async fn pending_users(State(store): State<Store>) -> Result<impl IntoResponse, AppError> {
    let pending: Vec<UserView> = store
        .pending_users()
        .await?
        .iter()
        .map(|u| u.view())
        .collect();

    Ok(Json(pending))
}

/// Approves an account: flips the directory flag and drops the entry from
/// the pending mirror. A repeat call is a find-miss.
pub async fn approve_user(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let found = store
        .update_users(|users| match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.approved = true;
                true
            }
            None => false,
        })
        .await?;

    if !found {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    store
        .update_pending_users(|pending| pending.retain(|u| u.id != id))
        .await?;

    tracing::info!(user_id = %id, "User approved");

    Ok(Json(json!({ "message": "User approved successfully" })))
}

/// Rejects an account: hard-deletes it from the directory and the pending
/// mirror. Irreversible; no audit trail is kept. Prevents deleting self.
pub async fn reject_user(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.sub {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let removed = store
        .update_users(|users| {
            let before = users.len();
            users.retain(|u| u.id != id);
            users.len() != before
        })
        .await?;

    if !removed {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    store
        .update_pending_users(|pending| pending.retain(|u| u.id != id))
        .await?;

    tracing::info!(user_id = %id, "User rejected and removed");

    Ok(StatusCode::NO_CONTENT)
}

/// Listings awaiting approval.
pub async fn pending_listings(State(store): State<Store>) -> Result<impl IntoResponse, AppError> {
    let pending: Vec<Listing> = store
        .listings()
        .await?
        .into_iter()
        .filter(|l| !l.approved)
        .collect();

    Ok(Json(pending))
}

/// Approves a listing. `approved` and `verified` flip together in one
/// persisted write; repeating the call leaves the state unchanged.
pub async fn approve_listing(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = store
        .update_listings(|listings| {
            listings.iter_mut().find(|l| l.id == id).map(|listing| {
                listing.approved = true;
                listing.verified = true;
                listing.clone()
            })
        })
        .await?;

    match updated {
        Some(listing) => {
            tracing::info!(listing_id = %id, "Listing approved");
            Ok(Json(listing))
        }
        None => Err(AppError::NotFound("Listing not found".to_string())),
    }
}

/// Rejects a listing: hard-deletes it. Irreversible.
pub async fn reject_listing(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = store
        .update_listings(|listings| {
            let before = listings.len();
            listings.retain(|l| l.id != id);
            listings.len() != before
        })
        .await?;

    if !removed {
        return Err(AppError::NotFound("Listing not found".to_string()));
    }

    tracing::info!(listing_id = %id, "Listing rejected and removed");

    Ok(StatusCode::NO_CONTENT)
}
