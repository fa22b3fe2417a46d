use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

pub const DEFAULT_RELYING_PARTY_URL: &str =
    "https://www.googleapis.com/identitytoolkit/v3/relyingparty";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("invalid token exchange URL")]
    Url(#[from] url::ParseError),
    #[error("token exchange request failed")]
    Transport(#[from] reqwest::Error),
    #[error("token exchange response is not JSON")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRequest<'a> {
    token: &'a str,
    return_secure_token: bool,
}

/// Trades custom tokens for ID tokens at the `verifyCustomToken` endpoint.
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
}

impl TokenExchangeClient {
    /// # Errors
    /// Returns an error if `relying_party_url` is not a valid base URL.
    pub fn new(
        client: Client,
        relying_party_url: &str,
        api_key: SecretString,
    ) -> Result<Self, ExchangeError> {
        let endpoint = Url::parse(&format!(
            "{}/verifyCustomToken",
            relying_party_url.trim_end_matches('/')
        ))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Exchange `custom_token` for an ID token.
    ///
    /// The response status is not checked: any JSON body without a string
    /// `idToken` yields `Ok(None)`.
    /// # Errors
    /// Returns an error on transport failure or when the body is not JSON.
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn exchange(&self, custom_token: &str) -> Result<Option<String>, ExchangeError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());

        let response = self
            .client
            .post(url)
            .json(&ExchangeRequest {
                token: custom_token,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let json: Value = serde_json::from_slice(&body)?;

        debug!("token exchange responded {}", status);

        let id_token = json["idToken"].as_str().map(str::to_string);
        if id_token.is_none() {
            warn!(
                %status,
                error = json["error"]["message"].as_str().unwrap_or(""),
                "token exchange response has no idToken"
            );
        }

        Ok(id_token)
    }
}
