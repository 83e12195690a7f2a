// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication for the admin API.
//!
//! When no token is configured, all admin requests are rejected
//! (fail-closed). A successful check attaches an admin [`Principal`] to
//! the request; handlers pass it to the engine, which re-checks the role.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use dogrun_core::Principal;

#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables the admin API entirely.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware guarding every admin route.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(ref expected) = auth.bearer_token else {
        tracing::error!("admin API has no token configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if token == Some(expected.as_str()) {
        request
            .extensions_mut()
            .insert(Principal::admin("gateway-admin"));
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::{Extension, Router, middleware as axum_middleware, routing::get};
    use tower::ServiceExt;

    fn guarded_router(bearer_token: Option<&str>) -> Router {
        let auth = AuthConfig {
            bearer_token: bearer_token.map(str::to_string),
        };
        Router::new()
            .route(
                "/admin",
                get(|Extension(principal): Extension<Principal>| async move {
                    principal.subject
                }),
            )
            .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
    }

    fn admin_request(authorization: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/admin");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn no_configured_token_rejects_every_request() {
        let response = guarded_router(None)
            .oneshot(admin_request(Some("Bearer anything")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_or_missing_token_is_rejected() {
        let wrong = guarded_router(Some("right-token"))
            .oneshot(admin_request(Some("Bearer wrong-token")))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let missing = guarded_router(Some("right-token"))
            .oneshot(admin_request(None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn matching_token_attaches_the_admin_principal() {
        let response = guarded_router(Some("right-token"))
            .oneshot(admin_request(Some("Bearer right-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"gateway-admin");
    }

    #[test]
    fn debug_never_prints_the_token() {
        let auth = AuthConfig {
            bearer_token: Some("super-secret".to_string()),
        };
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
