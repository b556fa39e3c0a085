use crate::{
    config::AppConfig,
    database::StoreError,
    models::{SigninRequest, SignupRequest, User},
    state::AppState,
    utils::AppError,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    pub name: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
}

#[derive(Clone)]
pub struct AuthSettings {
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            Duration::minutes(config.token_ttl_minutes),
            config.bcrypt_cost,
        )
    }
}

// Generate JWT token
pub fn issue_token(user: &User, settings: &AuthSettings) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + settings.token_ttl).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Token rejected: {}", e);
        AppError::Unauthorized
    })
}

async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    actix_web::web::block(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, digest: String) -> Result<bool, AppError> {
    let outcome = actix_web::web::block(move || verify(password, &digest))
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?;

    match outcome {
        Ok(valid) => Ok(valid),
        // Stored value is not a bcrypt digest (e.g. a legacy plaintext row): never matches
        Err(e) => {
            log::warn!("⚠️  Stored password is not a valid digest: {}", e);
            Ok(false)
        }
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(message))
}

// User signup
pub async fn signup(state: &AppState, request: SignupRequest) -> Result<(), AppError> {
    let email = required(request.email, "Email is required")?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request("Password is required"))?;
    let name = request.name.unwrap_or_default();

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let digest = hash_password(password, state.auth.bcrypt_cost).await?;

    let user = User {
        id: None,
        name,
        email,
        password: digest,
    };

    match state.users.insert_user(&user).await {
        Ok(()) => Ok(()),
        // Lost a race with a concurrent signup for the same email
        Err(StoreError::Duplicate) => Err(AppError::Conflict("Email already exists".to_string())),
        Err(e) => Err(e.into()),
    }
}

// User signin
pub async fn signin(state: &AppState, request: SigninRequest) -> Result<String, AppError> {
    let email = request.email.trim();

    let user = state
        .users
        .find_user_by_email(email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(request.password, user.password.clone()).await? {
        return Err(AppError::Unauthorized);
    }

    issue_token(&user, &state.auth)
}
