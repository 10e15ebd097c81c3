//! Email/password sign-in over the `accounts`/`roles` pair, JWT issuance,
//! and the role gate for the admin console. The role lookup (`ADMIN` / `IT`)
//! is the entire authorization model; there are no per-operation permissions.

use crate::{
    db::DbPool,
    entities::{
        account::{self, Entity as Account},
        role::{self, Entity as Role},
    },
    errors::ServiceError,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

const SALT_LEN: usize = 16;

/// Roles allowed into the console.
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_IT: &str = "IT";

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated identity attached to the request after token validation.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Whether this identity may use the console at all.
    pub fn has_console_access(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_IT
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expiration: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: String,
    pub expires_in: usize,
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    /// Salted SHA-256 digest stored as `salt$hex`.
    pub fn hash_password(password: &str) -> String {
        let salt: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();
        let digest = Self::digest(&salt, password);
        format!("{}${}", salt, digest)
    }

    fn digest(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn verify_password(password: &str, stored: &str) -> bool {
        match stored.split_once('$') {
            Some((salt, digest)) => Self::digest(salt, password) == digest,
            None => false,
        }
    }

    /// Verifies credentials against the accounts table and issues a JWT
    /// carrying the account's role name.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let db = self.db.as_ref();
        let account = Account::find()
            .filter(account::Column::Email.eq(email))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Invalid email or password".into()))?;

        if !account.is_active {
            warn!(email = %email, "login attempt on disabled account");
            return Err(ServiceError::AuthError("Account is disabled".into()));
        }
        if !Self::verify_password(password, &account.password_hash) {
            return Err(ServiceError::AuthError("Invalid email or password".into()));
        }

        let role = Role::find_by_id(account.role_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Account {} references a missing role",
                    account.account_id
                ))
            })?;

        let token = self.issue_token(&account, &role.role_name)?;
        debug!(email = %email, role = %role.role_name, "login succeeded");
        Ok(LoginResponse {
            token,
            email: account.email,
            role: role.role_name,
            expires_in: self.config.jwt_expiration,
        })
    }

    fn issue_token(&self, account: &account::Model, role_name: &str) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.account_id,
            email: account.email.clone(),
            role: role_name.to_string(),
            iat: now,
            exp: now + self.config.jwt_expiration as i64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::AuthError(format!("Failed to issue token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthUser, ServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ServiceError::AuthError(format!("Invalid token: {}", e)))?;

        Ok(AuthUser {
            account_id: data.claims.sub,
            email: data.claims.email,
            role: data.claims.role,
        })
    }

    /// Creates an account with the given role, creating the role row when it
    /// does not exist yet. Used for provisioning and test setup.
    #[instrument(skip(self, password))]
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        role_name: &str,
    ) -> Result<account::Model, ServiceError> {
        let db = self.db.as_ref();
        let role_id = match Role::find()
            .filter(role::Column::RoleName.eq(role_name))
            .one(db)
            .await?
        {
            Some(existing) => existing.role_id,
            None => {
                role::ActiveModel {
                    role_id: Set(Uuid::new_v4()),
                    role_name: Set(role_name.to_string()),
                }
                .insert(db)
                .await?
                .role_id
            }
        };

        let model = account::ActiveModel {
            account_id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(Self::hash_password(password)),
            role_id: Set(role_id),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(model)
    }
}

/// Bearer-token middleware. Validates the JWT, requires a console role, and
/// attaches the identity as a request extension.
pub async fn require_console_auth(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("Missing bearer token".into()))?;

    let user = auth.validate_token(token)?;
    if !user.has_console_access() {
        return Err(ServiceError::Forbidden(format!(
            "Role {} has no console access",
            user.role
        )));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip_verifies() {
        let stored = AuthService::hash_password("hunter2");
        assert!(AuthService::verify_password("hunter2", &stored));
        assert!(!AuthService::verify_password("hunter3", &stored));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!AuthService::verify_password("anything", "no-separator"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = AuthService::hash_password("same");
        let b = AuthService::hash_password("same");
        assert_ne!(a, b);
    }

    #[test]
    fn console_access_requires_admin_or_it() {
        let mut user = AuthUser {
            account_id: Uuid::new_v4(),
            email: "ops@example.com".into(),
            role: ROLE_IT.into(),
        };
        assert!(user.has_console_access());
        assert!(!user.is_admin());

        user.role = "EMPLOYEE".into();
        assert!(!user.has_console_access());
    }
}
