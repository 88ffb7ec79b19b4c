use sqlx::PgPool;

use crate::auth::{self, password, Claims};
use crate::config;
use crate::database::models::User;
use crate::error::ApiError;

/// Credential validation and identity-token issuance.
///
/// Both failure modes of `login` surface the same message so the API cannot
/// be used to enumerate accounts.
pub struct AuthService {
    pool: PgPool,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user account and issue its first identity token.
    ///
    /// The unique index on email is the backstop for concurrent duplicate
    /// registrations; a lost race surfaces as the same "already exists"
    /// error the pre-check produces.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), ApiError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            return Err(ApiError::bad_request("User already exists"));
        }

        let security = &config::config().security;
        let password_hash = password::hash_password(password, security.bcrypt_cost)?;

        let query = format!(
            "INSERT INTO users (id, username, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        let user: User = sqlx::query_as(&query)
            .bind(uuid::Uuid::new_v4())
            .bind(username)
            .bind(email)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if crate::database::is_unique_violation(&e) {
                    ApiError::bad_request("User already exists")
                } else {
                    ApiError::from(e)
                }
            })?;

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "Registered user {}", user.username);

        Ok((user, token))
    }

    /// Validate credentials and issue an identity token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user: Option<User> = sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        // Constant surface error for unknown email and wrong password alike
        let user = user.ok_or_else(|| ApiError::bad_request("Invalid credentials"))?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(ApiError::bad_request("Invalid credentials"));
        }

        self.issue_token(&user)
    }

    fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let security = &config::config().security;
        let claims = Claims::new(user.id, user.username.clone(), security.jwt_expiry_hours);
        Ok(auth::generate_jwt(&claims, &security.jwt_secret)?)
    }
}
