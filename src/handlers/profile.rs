// src/handlers/profile.rs

use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, store::Store, utils::jwt::Claims};

/// Current user's profile with live dashboard counts.
pub async fn get_me(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let users = store.users().await?;
    let user = users
        .iter()
        .find(|u| u.id == claims.sub)
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let listings_count = store
        .listings()
        .await?
        .iter()
        .filter(|l| l.farmer_id == user.id)
        .count();
    let purchases_count = store
        .payments()
        .await?
        .iter()
        .filter(|p| p.user_id == user.id)
        .count();

    Ok(Json(json!({
        "user": user.view(),
        "listings_count": listings_count,
        "purchases_count": purchases_count,
    })))
}

/// Whether the session user dismissed the status banner.
pub async fn banner_status(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let dismissed = store.banner_dismissed(&claims.sub).await?;
    Ok(Json(json!({ "dismissed": dismissed })))
}

/// Persistently dismisses the status banner for the session user.
pub async fn dismiss_banner(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    store.set_banner_dismissed(&claims.sub).await?;
    Ok(Json(json!({ "dismissed": true })))
}
