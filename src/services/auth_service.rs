//! Authentication service - registration, login and token handling.
//!
//! Password hashing lives in the domain `Password` value object; repository
//! access goes through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use domain::AuthResponse;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{normalize_email, CreateUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    #[serde(rename = "correo")]
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a client account and sign the caller in
    async fn register(&self, email: String, password: String, name: String)
        -> AppResult<AuthResponse>;

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
    /// Verified against when the email is unknown so both failures cost the same
    decoy: Password,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> AppResult<Self> {
        let decoy = Password::new(&Uuid::new_v4().to_string())?;
        Ok(Self { uow, config, decoy })
    }

    fn signed_in(&self, user: &User) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            token: generate_token(user, &self.config)?,
            user: user.to_snapshot(),
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Ya existe una cuenta con ese correo"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(CreateUser {
                email,
                password_hash,
                name: name.trim().to_string(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.signed_in(&user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);
        let user = self.uow.users().find_by_email(&email).await?;

        let valid = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()).verify(&password),
            None => {
                self.decoy.verify(&password);
                false
            }
        };

        match user {
            Some(user) if valid => {
                tracing::info!(user_id = %user.id, "User logged in");
                self.signed_in(&user)
            }
            _ => {
                tracing::warn!("Rejected login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
