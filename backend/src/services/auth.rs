//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use stocklink_shared::Role;
use tokio::sync::OnceCell;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    token_expiry: i64,
}

/// Input for registering a new account
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// A freshly issued identity token and the account it identifies
#[derive(Debug)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password_hash: String,
    #[sqlx(try_from = "String")]
    role: Role,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            token_expiry: config.jwt.token_expiry_secs,
        }
    }

    /// Register a new account and sign it in
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(&input.username)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let password_hash = hash_password(input.password).await?;
        let role = input.role.unwrap_or_default();

        // A concurrent registration surfaces as a unique violation -> Conflict
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, role
            "#,
        )
        .bind(&input.username)
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = user.id, role = %user.role, "user registered");

        let token = issue_token(&user, &self.jwt_secret, self.token_expiry)?;
        Ok(AuthSession { token, user })
    }

    /// Authenticate with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthSession> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        // Unknown usernames pay for a bcrypt verify too
        let known_hash = row.as_ref().map(|row| row.password_hash.clone());
        if !check_password(password, known_hash).await? {
            return Err(AppError::InvalidCredentials);
        }
        let row = row.ok_or(AppError::InvalidCredentials)?;

        let user = UserProfile {
            id: row.id,
            username: row.username,
            role: row.role,
        };

        tracing::info!(user_id = user.id, "user logged in");

        let token = issue_token(&user, &self.jwt_secret, self.token_expiry)?;
        Ok(AuthSession { token, user })
    }
}

/// Sign an identity token for `user` valid for `expiry_secs`
pub fn issue_token(user: &UserProfile, secret: &str, expiry_secs: i64) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Check signature and expiry of an identity token
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

/// Stand-in hash verified against when the username does not exist
static UNKNOWN_ACCOUNT_HASH: OnceCell<String> = OnceCell::const_new();

async fn unknown_account_hash() -> AppResult<&'static str> {
    UNKNOWN_ACCOUNT_HASH
        .get_or_try_init(|| hash_password("stocklink-unknown-account".to_string()))
        .await
        .map(String::as_str)
}

/// Verify `password` against the stored hash, or against a stand-in of the
/// same cost when there is none. Only a stored hash can match.
async fn check_password(password: &str, stored_hash: Option<String>) -> AppResult<bool> {
    match stored_hash {
        Some(hash) => verify_password(password.to_string(), hash).await,
        None => {
            let stand_in = unknown_account_hash().await?.to_string();
            verify_password(password.to_string(), stand_in).await?;
            Ok(false)
        }
    }
}

async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserProfile {
        UserProfile {
            id: 1,
            username: "alice".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(&alice(), "secret", 3600).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_with_wrong_secret_is_invalid() {
        let token = issue_token(&alice(), "secret", 3600).unwrap();
        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let token = issue_token(&alice(), "secret", -3600).unwrap();
        assert!(matches!(
            verify_token(&token, "secret"),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(matches!(
            verify_token("not-a-jwt", "secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_unknown_account_is_checked_like_a_known_one() {
        let stand_in = unknown_account_hash().await.unwrap();
        let parts: bcrypt::HashParts = stand_in.parse().unwrap();
        assert_eq!(parts.get_cost(), DEFAULT_COST);

        // Even the stand-in's own password never matches a missing account
        assert!(!check_password("stocklink-unknown-account", None)
            .await
            .unwrap());

        let stored = hash_password("secret123".to_string()).await.unwrap();
        assert!(check_password("secret123", Some(stored.clone())).await.unwrap());

        let started = std::time::Instant::now();
        assert!(!check_password("wrong", Some(stored)).await.unwrap());
        let known = started.elapsed();

        let started = std::time::Instant::now();
        assert!(!check_password("wrong", None).await.unwrap());
        let unknown = started.elapsed();

        assert!(
            unknown * 4 >= known,
            "unknown account answered in {:?}, known in {:?}",
            unknown,
            known
        );
    }

    #[tokio::test]
    async fn test_password_hash_verifies() {
        let hashed = hash_password("testpass123".to_string()).await.unwrap();
        assert_ne!(hashed, "testpass123");
        assert!(verify_password("testpass123".to_string(), hashed.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrongpass".to_string(), hashed).await.unwrap());
    }
}
