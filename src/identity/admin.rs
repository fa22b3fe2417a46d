use crate::identity::{
    IdentityAdmin, IdentityError, IdentityFuture, ServiceAccountKey, UserProfile,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Audience the exchange endpoint expects in custom tokens.
pub const CUSTOM_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

const ADMIN_SCOPES: &str =
    "https://www.googleapis.com/auth/cloud-platform https://www.googleapis.com/auth/identitytoolkit";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECONDS: i64 = 3600; // 1 hour, the provider maximum
const MAX_UID_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub uid: String,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// [`IdentityAdmin`] backed by the Identity Toolkit REST API and a service account key.
pub struct ServiceAccountAdmin {
    client: Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    accounts_url: Url,
}

impl fmt::Debug for ServiceAccountAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountAdmin")
            .field("project_id", &self.key.project_id)
            .field("client_email", &self.key.client_email)
            .field("accounts_url", &self.accounts_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAdmin {
    /// # Errors
    /// Returns an error if the private key is unusable or the base URL is invalid.
    pub fn new(
        client: Client,
        key: ServiceAccountKey,
        identity_toolkit_url: &str,
    ) -> Result<Self, IdentityError> {
        let signing_key = key.encoding_key()?;
        let accounts_url = Url::parse(&format!(
            "{}/v1/projects/{}/accounts",
            identity_toolkit_url.trim_end_matches('/'),
            key.project_id
        ))?;

        Ok(Self {
            client,
            key,
            signing_key,
            accounts_url,
        })
    }

    /// Sign a custom token for `uid` as of `now` (unix seconds).
    ///
    /// The header carries no `kid`, which keeps the token unusable as an ID token.
    /// # Errors
    /// Returns an error if the uid is empty or longer than 128 characters, or signing fails.
    pub fn sign_custom_token(&self, uid: &str, now: i64) -> Result<String, IdentityError> {
        let uid_length = uid.chars().count();
        if uid_length == 0 || uid_length > MAX_UID_LENGTH {
            return Err(IdentityError::InvalidArgument(format!(
                "uid must be a non-empty string with at most {MAX_UID_LENGTH} characters"
            )));
        }

        let claims = CustomTokenClaims {
            iss: self.key.client_email.clone(),
            sub: self.key.client_email.clone(),
            aud: CUSTOM_TOKEN_AUDIENCE.to_string(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECONDS,
            uid: uid.to_string(),
        };

        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.signing_key,
        )?)
    }

    /// OAuth2 access token for the admin API via the JWT bearer grant.
    #[instrument(skip(self))]
    async fn access_token(&self) -> Result<SecretString, IdentityError> {
        let now = unix_now();
        let assertion = encode(
            &Header::new(Algorithm::RS256),
            &AssertionClaims {
                iss: &self.key.client_email,
                scope: ADMIN_SCOPES,
                aud: &self.key.token_uri,
                iat: now,
                exp: now + TOKEN_LIFETIME_SECONDS,
            },
            &self.signing_key,
        )?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;

            return Err(IdentityError::Provider {
                status: status.as_u16(),
                message: format!("{} - {}", self.key.token_uri, body.trim()),
            });
        }

        let token: AccessTokenResponse = response.json().await?;

        Ok(SecretString::from(token.access_token))
    }
}

impl IdentityAdmin for ServiceAccountAdmin {
    fn create_user<'a>(&'a self, profile: &'a UserProfile) -> IdentityFuture<'a, ()> {
        Box::pin(async move {
            let token = self.access_token().await?;

            let response = self
                .client
                .post(self.accounts_url.clone())
                .bearer_auth(token.expose_secret())
                .json(profile)
                .send()
                .await?;

            let status = response.status();
            debug!("create user {} responded {}", profile.uid, status);

            if status.is_success() {
                return Ok(());
            }

            let body = response.text().await?;

            Err(provider_error(status, &body, profile))
        })
    }

    fn create_custom_token<'a>(&'a self, uid: &'a str) -> IdentityFuture<'a, String> {
        Box::pin(async move { self.sign_custom_token(uid, unix_now()) })
    }
}

/// Map an Identity Toolkit error body, `{"error": {"message": "CODE : detail"}}`.
fn provider_error(status: StatusCode, body: &str, profile: &UserProfile) -> IdentityError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    let code = message
        .split([':', ' '])
        .next()
        .unwrap_or_default()
        .trim();

    match code {
        "DUPLICATE_LOCAL_ID" => IdentityError::UidAlreadyExists(profile.uid.clone()),
        "EMAIL_EXISTS" => IdentityError::EmailAlreadyExists(profile.email.clone()),
        code if code.starts_with("INVALID_") => IdentityError::InvalidArgument(message),
        _ => IdentityError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
