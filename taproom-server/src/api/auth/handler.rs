//! Authentication Handlers
//!
//! Handles login, registration and the pending-user approval queue

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{pending_user, user};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{validate_password, validate_username};
use crate::{AppError, AppResult, security_log};

use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::{PendingUser, Profile};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Failures before the account locks
const MAX_FAILED_ATTEMPTS: i64 = 5;

/// Lock duration once the failure limit is reached
const LOCK_DURATION_MS: i64 = 15 * 60 * 1000;

/// POST /api/auth/login
///
/// Authenticates user credentials and returns a JWT token.
/// Five consecutive failures lock the account for fifteen minutes.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.clone();

    let account = user::find_by_username(&state.pool, &username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let account = match account {
        Some(u) => u,
        None => {
            security_log!("WARN", "login_failed", username = username.clone());
            return Err(AppError::invalid("Invalid username or password"));
        }
    };

    let now = shared::util::now_millis();
    if let Some(lock_until) = account.lock_until
        && now < lock_until
    {
        security_log!(
            "WARN",
            "login_locked",
            username = username.clone(),
            lock_until = lock_until
        );
        return Err(AppError::forbidden(
            "Account temporarily locked, try again later",
        ));
    }

    if !verify_password(&req.password, &account.password_hash)? {
        let attempts = account.failed_attempts + 1;
        let lock_until = if attempts >= MAX_FAILED_ATTEMPTS {
            Some(now + LOCK_DURATION_MS)
        } else {
            None
        };
        user::record_login_failure(&state.pool, account.id, attempts, lock_until).await?;

        security_log!(
            "WARN",
            "login_failed",
            username = username.clone(),
            attempts = attempts
        );
        return Err(AppError::invalid("Invalid username or password"));
    }

    user::reset_login_failures(&state.pool, account.id).await?;

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(account.id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role.as_str(),
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: account.id,
            username: account.username,
            role: account.role,
        },
    }))
}

/// POST /api/auth/register
///
/// Queues a new account for staff approval. The account cannot log
/// in until someone approves it.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<PendingUser>> {
    let username = req.username.trim();
    validate_username(username)?;
    validate_password(&req.password)?;

    // The unique index on pending_users catches a double registration;
    // an already-approved name is checked here.
    if user::find_by_username(&state.pool, username)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Username {username} is already taken"
        )));
    }

    let password_hash = hash_password(&req.password)?;
    let pending = pending_user::create(&state.pool, username, &password_hash).await?;

    tracing::info!(username = %pending.username, "Registration queued for approval");

    Ok(Json(pending))
}

/// GET /api/auth/pending-users - 待审核注册队列 (员工)
pub async fn pending_users(State(state): State<ServerState>) -> AppResult<Json<Vec<PendingUser>>> {
    let queue = pending_user::find_all(&state.pool).await?;
    Ok(Json(queue))
}

/// POST /api/auth/pending-users/:id/approve - 批准注册
pub async fn approve_pending_user(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Profile>> {
    let approved = pending_user::approve(&state.pool, id).await?;

    tracing::info!(user_id = approved.id, username = %approved.username, "Registration approved");

    Ok(Json(Profile {
        id: approved.id,
        username: approved.username,
        role: approved.role,
        beer_count: approved.beer_count,
        free_beers: approved.free_beers,
        created_at: approved.created_at,
    }))
}

/// POST /api/auth/pending-users/:id/reject - 拒绝注册
pub async fn reject_pending_user(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    pending_user::reject(&state.pool, id).await?;
    Ok(Json(true))
}
