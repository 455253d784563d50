use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use axum::{
    Json, async_trait,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use crate::models::admin_user;

/// Signing key for admin tokens, extracted from application state
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Where token holders are checked against; `None` trusts the token alone
#[derive(Clone)]
pub struct AdminAccounts(pub Option<DatabaseConnection>);

type AuthRejection = (StatusCode, Json<serde_json::Value>);

fn reject(status: StatusCode, message: &str) -> AuthRejection {
    (status, Json(json!({ "status": "error", "error": message })))
}

/// A signed token only counts while its admin row exists and is active
async fn ensure_active(db: &DatabaseConnection, admin_id: i64) -> Result<(), AuthRejection> {
    let active = admin_user::Entity::find_by_id(admin_id)
        .filter(admin_user::Column::IsActive.eq(true))
        .count(db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up admin {}: {}", admin_id, e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify account")
        })?;

    if active == 0 {
        tracing::warn!("Rejected token for inactive or missing admin {}", admin_id);
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            "Account is inactive or no longer exists",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub admin_id: i64,
    pub role: String,
    pub exp: usize,
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
    AdminAccounts: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return Err(reject(
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ));
        };

        let JwtSecret(secret) = JwtSecret::from_ref(state);
        let claims = decode_jwt(&secret, token)
            .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        if let AdminAccounts(Some(db)) = AdminAccounts::from_ref(state) {
            ensure_active(&db, claims.admin_id).await?;
        }
        Ok(claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_jwt(secret: &str, admin_id: i64, username: &str, role: &str) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or("expiry out of range")?
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        admin_id,
        role: role.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
