// src/routes.rs

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, auth, email, listing, marketplace, payment, profile},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, marketplace, listings, admin, payments).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, config, limiter, mailer, provider client).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let marketplace_routes = Router::new().route("/", get(marketplace::list_marketplace));

    let listing_routes = Router::new()
        .route("/", post(listing::create_listing))
        .route("/mine", get(listing::list_my_listings))
        .route("/{id}", delete(listing::delete_listing))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/stats", get(admin::stats))
        .route("/users/pending", get(admin::pending_users))
        .route("/users/{id}/approve", post(admin::approve_user))
        .route("/users/{id}/reject", post(admin::reject_user))
        .route("/listings/pending", get(admin::pending_listings))
        .route("/listings/{id}/approve", post(admin::approve_listing))
        .route("/listings/{id}/reject", post(admin::reject_listing))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let payment_routes = Router::new()
        .route("/", post(payment::record_payment))
        .route("/mine", get(payment::my_purchases))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Order creation/verification mirrors the public serverless surface.
        .route(
            "/order",
            post(payment::create_order).put(payment::verify_order),
        );

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me))
        .route("/banner", get(profile::banner_status))
        .route("/banner/dismiss", post(profile::dismiss_banner))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/marketplace", marketplace_routes)
        .nest("/api/listings", listing_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/profile", profile_routes)
        .route("/api/send-email", post(email::send_email))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
