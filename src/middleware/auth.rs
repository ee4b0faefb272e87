use axum::{extract::FromRequestParts, http::header};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::auth::{Claims, TokenKind},
    entity::users::Role,
    error::AppError,
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.role.can_administer() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn issue_token(
    config: &AppConfig,
    user_id: Uuid,
    role: Role,
    kind: TokenKind,
) -> Result<String, AppError> {
    let ttl = match kind {
        TokenKind::Access => config.access_token_ttl,
        TokenKind::Refresh => config.refresh_token_ttl,
    };
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        typ: kind,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Decode a token and insist on its kind, so refresh tokens never pass as access tokens.
pub fn decode_token(config: &AppConfig, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    if decoded.claims.typ != kind {
        return Err(AppError::Unauthorized("Wrong token type".into()));
    }
    Ok(decoded.claims)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        let claims = decode_token(&state.config, token, TokenKind::Access)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::for_database("sqlite::memory:", "unit-test-secret")
    }

    #[test]
    fn access_token_round_trips_subject_and_role() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = issue_token(&config, user_id, Role::Admin, TokenKind::Access).unwrap();

        let claims = decode_token(&config, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let config = config();
        let token = issue_token(&config, Uuid::new_v4(), Role::User, TokenKind::Refresh).unwrap();

        let err = decode_token(&config, &token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(
            &AppConfig::for_database("sqlite::memory:", "other-secret"),
            Uuid::new_v4(),
            Role::User,
            TokenKind::Access,
        )
        .unwrap();

        assert!(decode_token(&config(), &token, TokenKind::Access).is_err());
    }

    #[test]
    fn ensure_admin_rejects_regular_users() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::User,
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));

        let admin = AuthUser {
            role: Role::Admin,
            ..user
        };
        assert!(ensure_admin(&admin).is_ok());
    }
}
