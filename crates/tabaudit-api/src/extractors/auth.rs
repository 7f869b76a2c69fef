//! `AuthUser` extractor: resolves the bearer token to an active user and
//! builds the request context.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, USER_AGENT};
use axum::http::request::Parts;

use tabaudit_core::error::AppError;
use tabaudit_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode(token)?;

        // The role and activity flag come from the store, not the token.
        let user = state
            .user_service
            .resolve_principal(claims.user_id())
            .await?;

        Ok(AuthUser(RequestContext::for_user(
            &user,
            client_ip(parts),
            parts
                .headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        )))
    }
}

/// First address of `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| {
            parts
                .headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
        })
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder();
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_address() {
        let p = parts(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "10.0.0.9"),
        ]);
        assert_eq!(client_ip(&p).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let p = parts(&[("x-real-ip", "10.0.0.9")]);
        assert_eq!(client_ip(&p).as_deref(), Some("10.0.0.9"));
        assert_eq!(client_ip(&parts(&[])), None);
    }
}
