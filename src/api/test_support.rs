//! In-memory identity admin for handler tests.

use crate::api::AppContext;
use crate::identity::{
    IdentityAdmin, IdentityError, IdentityFuture, TokenExchangeClient, UserProfile,
};
use anyhow::Result;
use httpmock::MockServer;
use reqwest::Client;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};

/// Records created users and rejects duplicate uids like the provider does.
#[derive(Debug, Default)]
pub(crate) struct MemoryAdmin {
    users: Mutex<Vec<String>>,
}

impl MemoryAdmin {
    pub(crate) fn registered_uids(&self) -> Vec<String> {
        self.users
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl IdentityAdmin for MemoryAdmin {
    fn create_user<'a>(&'a self, profile: &'a UserProfile) -> IdentityFuture<'a, ()> {
        Box::pin(async move {
            let mut users = self
                .users
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if users.contains(&profile.uid) {
                return Err(IdentityError::UidAlreadyExists(profile.uid.clone()));
            }
            users.push(profile.uid.clone());
            Ok(())
        })
    }

    fn create_custom_token<'a>(&'a self, uid: &'a str) -> IdentityFuture<'a, String> {
        Box::pin(async move {
            if uid.is_empty() {
                return Err(IdentityError::InvalidArgument("empty uid".to_string()));
            }
            Ok(format!("custom-token-for-{uid}"))
        })
    }
}

/// Context with a [`MemoryAdmin`] and an exchange client pointed at `server`.
pub(crate) fn test_app(server: &MockServer) -> Result<(AppContext, Arc<MemoryAdmin>)> {
    let admin = Arc::new(MemoryAdmin::default());
    let exchange = TokenExchangeClient::new(
        Client::new(),
        &server.base_url(),
        SecretString::from("test-api-key"),
    )?;
    Ok((AppContext::new(admin.clone(), exchange), admin))
}
