use crate::identity::IdentityError;
use jsonwebtoken::EncodingKey;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{fs, path::Path};

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Deserialize)]
struct RawServiceAccountKey {
    #[serde(rename = "type")]
    kind: Option<String>,
    project_id: Option<String>,
    private_key: Option<String>,
    client_email: Option<String>,
    token_uri: Option<String>,
}

/// Google service account JSON key, as downloaded from the cloud console.
#[derive(Debug, Clone)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub token_uri: String,
    private_key: SecretString,
}

impl ServiceAccountKey {
    /// Parse a service account key.
    /// # Errors
    /// Returns an error if the JSON is malformed, is not a service account key, or misses a field.
    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        let raw: RawServiceAccountKey = serde_json::from_str(json)
            .map_err(|err| IdentityError::Credentials(format!("malformed JSON: {err}")))?;

        if let Some(kind) = raw.kind.as_deref()
            && kind != "service_account"
        {
            return Err(IdentityError::Credentials(format!(
                "expected a service_account key, got {kind}"
            )));
        }

        Ok(Self {
            project_id: required(raw.project_id, "project_id")?,
            client_email: required(raw.client_email, "client_email")?,
            token_uri: raw
                .token_uri
                .filter(|uri| !uri.trim().is_empty())
                .unwrap_or_else(|| GOOGLE_TOKEN_URI.to_string()),
            private_key: SecretString::from(required(raw.private_key, "private_key")?),
        })
    }

    /// Read and parse a service account key file.
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold a valid key.
    pub fn from_file(path: &Path) -> Result<Self, IdentityError> {
        let json = fs::read_to_string(path).map_err(|err| {
            IdentityError::Credentials(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// RSA signing key for RS256 assertions.
    /// # Errors
    /// Returns an error if the private key is not a PEM encoded RSA key.
    pub fn encoding_key(&self) -> Result<EncodingKey, IdentityError> {
        EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes()).map_err(|err| {
            IdentityError::Credentials(format!("private_key is not a valid RSA PEM: {err}"))
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, IdentityError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| IdentityError::Credentials(format!("missing {field}")))
}
