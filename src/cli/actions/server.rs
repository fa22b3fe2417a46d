use crate::{
    api,
    cli::{globals::GlobalArgs, telemetry},
    identity::ServiceAccountKey,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_key: SecretString,
    pub credentials: PathBuf,
    pub identity_toolkit_url: String,
    pub relying_party_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the service account key cannot be loaded or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let service_account = ServiceAccountKey::from_file(&args.credentials)
        .context("Could not load service account credentials")?;

    log_startup_args(&args, &service_account);

    let mut globals = GlobalArgs::new(args.api_key, service_account);
    globals.set_endpoints(args.identity_toolkit_url, args.relying_party_url);

    let result = api::new(args.port, &globals).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args, service_account: &ServiceAccountKey) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("project_id", service_account.project_id.clone()),
        ("client_email", service_account.client_email.clone()),
        ("credentials", args.credentials.display().to_string()),
        ("identity_toolkit_url", args.identity_toolkit_url.clone()),
        ("relying_party_url", args.relying_party_url.clone()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "idmint - {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
