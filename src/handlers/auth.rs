// src/handlers/auth.rs

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{Config, LOCKOUT_DURATION_SECS, MAX_LOGIN_ATTEMPTS},
    error::AppError,
    models::user::{LoginRequest, Role, SignupRequest, User, validate_password},
    security::{
        lockout::{check_login_attempts, record_login_attempt},
        rate_limit::RateLimiter,
    },
    store::Store,
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_session,
        sanitize::sanitize_text,
    },
};

/// Registers a new account, pending admin approval.
///
/// Checks run in order: rate limit, password confirmation, password policy,
/// duplicate email. Nothing is persisted until every check passes; on
/// success the account lands in both the user directory and the
/// pending-approval mirror.
pub async fn signup(
    State(store): State<Store>,
    State(config): State<Config>,
    State(limiter): State<Arc<RateLimiter>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let name = sanitize_text(&payload.name);
    let email = sanitize_text(&payload.email);

    if !limiter.check(&format!("signup_{email}")) {
        return Err(AppError::RateLimited(
            "Too many signup attempts. Please try again later.".to_string(),
        ));
    }

    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match.".to_string()));
    }

    if let Some(message) = validate_password(&payload.password) {
        return Err(AppError::BadRequest(message.to_string()));
    }

    if payload.role == Role::Admin {
        return Err(AppError::BadRequest(
            "Role must be farmer or company.".to_string(),
        ));
    }

    // Simulated network latency. An explicit async sleep: dropping the
    // request (client navigated away) cancels the pending completion.
    tokio::time::sleep(Duration::from_millis(config.auth_delay_ms)).await;

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(name, email.clone(), password_hash, payload.role);

    let inserted = store
        .update_users(|users| {
            if users.iter().any(|u| u.email == email) {
                false
            } else {
                users.push(user.clone());
                true
            }
        })
        .await?;

    if !inserted {
        return Err(AppError::Conflict(
            "User with this email already exists.".to_string(),
        ));
    }

    store
        .update_pending_users(|pending| pending.push(user.clone()))
        .await?;

    tracing::info!(email = %user.email, role = %user.role, "New account pending approval");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created! Pending admin approval.",
            "user": user.view(),
        })),
    ))
}

/// Authenticates an account and issues a session token.
///
/// The rate limiter and the lockout tracker both run before credentials are
/// touched. Three outcomes past that point: approved match (token), match
/// pending approval (rejected, counted as a failed attempt), no match
/// (generic rejection, counted as a failed attempt).
pub async fn login(
    State(store): State<Store>,
    State(config): State<Config>,
    State(limiter): State<Arc<RateLimiter>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = sanitize_text(&payload.email);

    if !limiter.check(&format!("login_{email}")) {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let lockout = check_login_attempts(
        &store,
        &email,
        MAX_LOGIN_ATTEMPTS,
        Duration::from_secs(LOCKOUT_DURATION_SECS),
    )
    .await?;
    if lockout.locked {
        return Err(AppError::RateLimited(format!(
            "Account temporarily locked. Try again in {} minutes.",
            lockout.remaining_minutes
        )));
    }

    tokio::time::sleep(Duration::from_millis(config.auth_delay_ms)).await;

    let users = store.users().await?;
    let user = users.iter().find(|u| u.email == email);

    let credentials_match = match user {
        Some(u) => verify_password(&payload.password, &u.password_hash)?,
        None => false,
    };

    match user {
        Some(u) if credentials_match && u.approved => {
            record_login_attempt(&store, &email, true).await?;
            let token = sign_session(u, &config.jwt_secret, config.session_timeout_secs)?;

            tracing::info!(user_id = %u.id, role = %u.role, "Login successful");

            Ok(Json(json!({
                "token": token,
                "type": "Bearer",
                "role": u.role,
                "name": u.name,
            })))
        }
        Some(_) if credentials_match => {
            record_login_attempt(&store, &email, false).await?;
            Err(AppError::AuthError(
                "Your account is pending admin approval. Please check back later.".to_string(),
            ))
        }
        _ => {
            record_login_attempt(&store, &email, false).await?;
            Err(AppError::AuthError("Invalid email or password.".to_string()))
        }
    }
}
