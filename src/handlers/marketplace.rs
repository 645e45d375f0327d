// src/handlers/marketplace.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::listing::{Listing, ListingFilter, filter_listings},
    store::Store,
};

/// Public marketplace view: approved listings only, optionally narrowed by
/// case-insensitive state/district substrings and a price ceiling. The
/// filter recomputes a view; the catalog itself is never touched.
pub async fn list_marketplace(
    State(store): State<Store>,
    Query(filter): Query<ListingFilter>,
) -> Result<impl IntoResponse, AppError> {
    let approved: Vec<Listing> = store
        .listings()
        .await?
        .into_iter()
        .filter(|l| l.approved)
        .collect();

    Ok(Json(filter_listings(approved, &filter)))
}
