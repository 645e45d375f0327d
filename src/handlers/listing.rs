// src/handlers/listing.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        listing::{CreateListingRequest, Listing},
        user::Role,
    },
    store::Store,
    utils::{jwt::Claims, sanitize::sanitize_text},
};

/// Submits a new listing for admin approval.
/// Farmer sessions only; the owner identity is stamped from the session.
pub async fn create_listing(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != Role::Farmer.as_str() {
        return Err(AppError::Forbidden(
            "Only farmers can add listings".to_string(),
        ));
    }

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let sanitized = CreateListingRequest {
        title: sanitize_text(&payload.title),
        description: sanitize_text(&payload.description),
        state: sanitize_text(&payload.state),
        district: sanitize_text(&payload.district),
        quantity: payload.quantity,
        price: payload.price,
    };

    let listing = Listing::new(sanitized, &claims.sub, &claims.name);

    store
        .update_listings(|listings| listings.push(listing.clone()))
        .await?;

    tracing::info!(listing_id = %listing.id, farmer_id = %claims.sub, "Listing submitted for approval");

    Ok((StatusCode::CREATED, Json(listing)))
}

/// All listings owned by the session's farmer, regardless of approval state.
pub async fn list_my_listings(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mine: Vec<Listing> = store
        .listings()
        .await?
        .into_iter()
        .filter(|l| l.farmer_id == claims.sub)
        .collect();

    Ok(Json(mine))
}

/// Deletes a listing. Owner only.
pub async fn delete_listing(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store
        .update_listings(|listings| match listings.iter().position(|l| l.id == id) {
            None => Err(AppError::NotFound("Listing not found".to_string())),
            Some(idx) if listings[idx].farmer_id != claims.sub => Err(AppError::Forbidden(
                "You can only delete your own listings".to_string(),
            )),
            Some(idx) => {
                listings.remove(idx);
                Ok(())
            }
        })
        .await??;

    tracing::info!(listing_id = %id, farmer_id = %claims.sub, "Listing deleted");

    Ok(StatusCode::NO_CONTENT)
}
