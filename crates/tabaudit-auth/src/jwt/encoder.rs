//! JWT token creation.
//!
//! Production tokens come from the organization's identity provider. The
//! encoder exists for the operator CLI and for tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use tabaudit_core::config::AuthConfig;
use tabaudit_core::error::AppError;
use tabaudit_entity::user::User;

use super::claims::Claims;

/// Creates signed bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Signs a token for `user` valid for the configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.issue_with_ttl(user, Duration::minutes(self.ttl_minutes))
    }

    /// Signs a token for `user` valid for `ttl`.
    pub fn issue_with_ttl(&self, user: &User, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            employee_id: user.employee_id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtDecoder;
    use tabaudit_core::error::ErrorKind;
    use tabaudit_entity::user::{UserRole, UserStatus};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_access_ttl_minutes: 30,
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            employee_id: "E1001".to_string(),
            username: "alice".to_string(),
            email: None,
            role: UserRole::Admin,
            status: UserStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_decode() {
        let cfg = config("test-secret");
        let user = user();
        let token = JwtEncoder::new(&cfg).issue(&user).unwrap();
        let claims = JwtDecoder::new(&cfg).decode(&token).unwrap();
        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.employee_id, "E1001");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtEncoder::new(&config("one")).issue(&user()).unwrap();
        let err = JwtDecoder::new(&config("two")).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_expired_token_rejected() {
        let cfg = config("test-secret");
        let token = JwtEncoder::new(&cfg)
            .issue_with_ttl(&user(), Duration::minutes(-10))
            .unwrap();
        let err = JwtDecoder::new(&cfg).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Token has expired");
    }
}
