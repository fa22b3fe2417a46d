//! Identity provider seam.
//!
//! [`IdentityAdmin`] is the privileged side of the provider (user creation and
//! custom token signing). [`TokenExchangeClient`] is the public side that trades a
//! custom token for an ID token.

mod admin;
mod credentials;
mod exchange;

pub use self::admin::{
    CUSTOM_TOKEN_AUDIENCE, CustomTokenClaims, DEFAULT_IDENTITY_TOOLKIT_URL, ServiceAccountAdmin,
};
pub use self::credentials::ServiceAccountKey;
pub use self::exchange::{DEFAULT_RELYING_PARTY_URL, ExchangeError, TokenExchangeClient};

use serde::Serialize;
use std::{future::Future, pin::Pin};
use thiserror::Error;

/// uid used when the caller does not supply one.
pub const FALLBACK_UID: &str = "max-mustermann-uid";

pub const TEST_DISPLAY_NAME: &str = "Max Mustermann";
pub const TEST_EMAIL: &str = "max-mustermann@test.test";
pub const TEST_PASSWORD: &str = "i like ice cream";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("user with uid {0} already exists")]
    UidAlreadyExists(String),
    #[error("user with email {0} already exists")]
    EmailAlreadyExists(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("identity provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("invalid service account credentials: {0}")]
    Credentials(String),
    #[error("invalid identity provider URL")]
    Url(#[from] url::ParseError),
    #[error("failed to sign token")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("identity provider request failed")]
    Transport(#[from] reqwest::Error),
}

/// Account attributes sent to the provider, using the provider's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
    pub password: String,
    #[serde(rename = "localId")]
    pub uid: String,
}

impl UserProfile {
    /// The fixed test account, registered under `uid`.
    #[must_use]
    pub fn test_user(uid: impl Into<String>) -> Self {
        Self {
            display_name: TEST_DISPLAY_NAME.to_string(),
            email: TEST_EMAIL.to_string(),
            email_verified: true,
            password: TEST_PASSWORD.to_string(),
            uid: uid.into(),
        }
    }
}

/// Resolve the uid of a request, falling back to [`FALLBACK_UID`].
#[must_use]
pub fn resolve_uid(uid: Option<String>) -> String {
    uid.unwrap_or_else(|| FALLBACK_UID.to_string())
}

pub type IdentityFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, IdentityError>> + Send + 'a>>;

/// Privileged identity provider operations.
pub trait IdentityAdmin: Send + Sync {
    /// Create a user account. Fails with [`IdentityError::UidAlreadyExists`] when
    /// the uid is taken.
    fn create_user<'a>(&'a self, profile: &'a UserProfile) -> IdentityFuture<'a, ()>;

    /// Sign a custom token for `uid`. The token is only usable for the exchange.
    fn create_custom_token<'a>(&'a self, uid: &'a str) -> IdentityFuture<'a, String>;
}
