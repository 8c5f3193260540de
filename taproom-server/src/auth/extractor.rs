//! CurrentUser 提取器
//!
//! Reads the identity that `require_auth` placed in request extensions.
//! Every `/api` route sits behind that middleware, so a missing entry
//! means the request never passed authentication.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentUser>() {
            Some(user) => Ok(user.clone()),
            None => {
                security_log!(
                    "WARN",
                    "auth_context_missing",
                    uri = format!("{:?}", parts.uri)
                );
                Err(AppError::unauthorized())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    use crate::AppError;
    use crate::auth::{CurrentUser, JwtConfig, JwtService};
    use crate::core::{Config, ServerState};
    use crate::db::test_pool;
    use shared::models::Role;

    async fn test_state() -> ServerState {
        let jwt = JwtService::with_config(JwtConfig {
            secret: "extractor-test-secret-of-enough-length".to_string(),
            expiration_minutes: 60,
            issuer: "taproom-server".to_string(),
            audience: "taproom-clients".to_string(),
        });
        ServerState::new(
            Config::with_overrides("/tmp/taproom-test", 0),
            test_pool().await,
            Arc::new(jwt),
        )
    }

    #[tokio::test]
    async fn reads_user_from_extensions() {
        let state = test_state().await;
        let user = CurrentUser {
            id: 7,
            username: "alice".to_string(),
            role: Role::Customer,
        };

        let mut req = Request::builder()
            .uri("/api/users/profile")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(user.clone());
        let (mut parts, _) = req.into_parts();

        let extracted = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(extracted.id, user.id);
        assert_eq!(extracted.username, "alice");
    }

    #[tokio::test]
    async fn rejects_without_auth_context() {
        let state = test_state().await;
        let req = Request::builder()
            .uri("/api/users/profile")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
