use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::models::{ROLE_STAFF, TokenPair, User};
use crate::{config::Config, utils::AppError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessTokenClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Unauthorized("Invalid token".to_owned()))
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role == ROLE_STAFF {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You don't have permission to perform this action".to_owned(),
            ))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    /// Token id; its bcrypt hash is what `users.hashed_rt` stores.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token pair and the refresh token id to persist.
pub struct IssuedTokens {
    pub pair: TokenPair,
    pub refresh_id: String,
}

pub fn issue_tokens(user: &User, config: &Config) -> Result<IssuedTokens, AppError> {
    let now = Utc::now();
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());

    let access = AccessTokenClaims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(config.access_token_ttl_minutes)).timestamp(),
    };

    let refresh_id = Uuid::new_v4().to_string();
    let refresh = RefreshTokenClaims {
        sub: user.id.to_string(),
        jti: refresh_id.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(config.refresh_token_ttl_days)).timestamp(),
    };

    Ok(IssuedTokens {
        pair: TokenPair {
            access_token: sign(&access, &key)?,
            refresh_token: sign(&refresh, &key)?,
            token_type: "Bearer".to_owned(),
        },
        refresh_id,
    })
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey) -> Result<String, AppError> {
    encode(&Header::default(), claims, key)
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
}

fn decode_claims<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, AppError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("rejected token: {e}");
        AppError::Unauthorized("Invalid or expired token".to_owned())
    })
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<AccessTokenClaims, AppError> {
    decode_claims(token, secret)
}

pub fn decode_refresh_token(token: &str, secret: &str) -> Result<RefreshTokenClaims, AppError> {
    decode_claims(token, secret)
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid authorization header".to_owned()))?;

    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_owned()))
}

impl<S> FromRequestParts<S> for AccessTokenClaims
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("Please login to continue".to_owned()))?;
        let config = Arc::<Config>::from_ref(state);

        decode_access_token(token, &config.jwt_secret)
    }
}

impl<S> OptionalFromRequestParts<S> for AccessTokenClaims
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(None),
            Some(token) => {
                let config = Arc::<Config>::from_ref(state);
                decode_access_token(token, &config.jwt_secret).map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::ROLE_USER;
    use chrono::NaiveDateTime;

    fn config(secret: &str) -> Config {
        Config {
            database_url: "postgres://localhost/shop".to_owned(),
            jwt_secret: secret.to_owned(),
            bind_addr: "127.0.0.1:0".to_owned(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
            rmq_url: None,
            mail: None,
        }
    }

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "bob".to_owned(),
            email: "bob@example.com".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            hashed_rt: None,
            role: role.to_owned(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn access_token_carries_user_and_role() {
        let user = user(ROLE_STAFF);
        let issued = issue_tokens(&user, &config("s3cret")).unwrap();

        let claims = decode_access_token(&issued.pair.access_token, "s3cret").unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert!(claims.require_staff().is_ok());
    }

    #[test]
    fn refresh_token_carries_the_persisted_id() {
        let issued = issue_tokens(&user(ROLE_USER), &config("s3cret")).unwrap();

        let claims = decode_refresh_token(&issued.pair.refresh_token, "s3cret").unwrap();
        assert_eq!(claims.jti, issued.refresh_id);
    }

    #[test]
    fn access_token_is_not_a_refresh_token() {
        let issued = issue_tokens(&user(ROLE_USER), &config("s3cret")).unwrap();
        assert!(decode_refresh_token(&issued.pair.access_token, "s3cret").is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = issue_tokens(&user(ROLE_USER), &config("s3cret")).unwrap();
        let err = decode_access_token(&issued.pair.access_token, "other").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut config = config("s3cret");
        config.access_token_ttl_minutes = -10;
        let issued = issue_tokens(&user(ROLE_USER), &config).unwrap();

        assert!(decode_access_token(&issued.pair.access_token, "s3cret").is_err());
    }

    #[test]
    fn regular_users_are_not_staff() {
        let issued = issue_tokens(&user(ROLE_USER), &config("s3cret")).unwrap();
        let claims = decode_access_token(&issued.pair.access_token, "s3cret").unwrap();

        assert!(matches!(claims.require_staff(), Err(AppError::Forbidden(_))));
    }
}
