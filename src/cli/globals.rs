use crate::identity::ServiceAccountKey;
use secrecy::SecretString;

/// Configuration loaded once at startup and shared by the whole process.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_key: SecretString,
    pub service_account: ServiceAccountKey,
    pub identity_toolkit_url: String,
    pub relying_party_url: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_key: SecretString, service_account: ServiceAccountKey) -> Self {
        Self {
            api_key,
            service_account,
            identity_toolkit_url: crate::identity::DEFAULT_IDENTITY_TOOLKIT_URL.to_string(),
            relying_party_url: crate::identity::DEFAULT_RELYING_PARTY_URL.to_string(),
        }
    }

    pub fn set_endpoints(&mut self, identity_toolkit_url: String, relying_party_url: String) {
        self.identity_toolkit_url = identity_toolkit_url;
        self.relying_party_url = relying_party_url;
    }
}
