use crate::identity::{DEFAULT_IDENTITY_TOOLKIT_URL, DEFAULT_RELYING_PARTY_URL};
use clap::{Arg, Command};

pub const ARG_API_KEY: &str = "api-key";
pub const ARG_CREDENTIALS: &str = "credentials";
pub const ARG_IDENTITY_TOOLKIT_URL: &str = "identity-toolkit-url";
pub const ARG_RELYING_PARTY_URL: &str = "relying-party-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Web API key of the Firebase project, used for the token exchange")
                .env("IDMINT_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS)
                .long(ARG_CREDENTIALS)
                .help("Path to the service account JSON key")
                .env("GOOGLE_APPLICATION_CREDENTIALS")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDENTITY_TOOLKIT_URL)
                .long(ARG_IDENTITY_TOOLKIT_URL)
                .help("Identity Toolkit admin API base URL")
                .env("IDMINT_IDENTITY_TOOLKIT_URL")
                .default_value(DEFAULT_IDENTITY_TOOLKIT_URL),
        )
        .arg(
            Arg::new(ARG_RELYING_PARTY_URL)
                .long(ARG_RELYING_PARTY_URL)
                .help("Identity Toolkit relying party base URL (verifyCustomToken)")
                .env("IDMINT_RELYING_PARTY_URL")
                .default_value(DEFAULT_RELYING_PARTY_URL),
        )
}
