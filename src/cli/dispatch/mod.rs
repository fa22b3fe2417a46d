use crate::cli::{
    actions::{Action, server::Args},
    commands::{self, identity},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    let api_key = matches
        .get_one::<String>(identity::ARG_API_KEY)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --api-key")?;

    let credentials = matches
        .get_one::<String>(identity::ARG_CREDENTIALS)
        .map(PathBuf::from)
        .context("missing required argument: --credentials")?;

    let identity_toolkit_url = matches
        .get_one::<String>(identity::ARG_IDENTITY_TOOLKIT_URL)
        .cloned()
        .unwrap_or_else(|| crate::identity::DEFAULT_IDENTITY_TOOLKIT_URL.to_string());

    let relying_party_url = matches
        .get_one::<String>(identity::ARG_RELYING_PARTY_URL)
        .cloned()
        .unwrap_or_else(|| crate::identity::DEFAULT_RELYING_PARTY_URL.to_string());

    Ok(Action::Server(Args {
        port,
        api_key,
        credentials,
        identity_toolkit_url,
        relying_party_url,
    }))
}
