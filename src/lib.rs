//! # idmint (Test Identity Mint)
//!
//! `idmint` is a tiny HTTP service used by client test suites that need a real
//! Firebase Authentication user and a real ID token for it.
//!
//! It exposes two endpoints:
//!
//! - `POST /registerUser` provisions a fixed test account (`Max Mustermann`) under
//!   the supplied `uid`, or under `max-mustermann-uid` when none is given.
//! - `POST /getAuthToken` signs a **custom token** for the `uid` with the configured
//!   service account and exchanges it at the Identity Toolkit `verifyCustomToken`
//!   endpoint for an **ID token**, which is returned as the raw response body.
//!
//! ## Custom tokens vs ID tokens
//!
//! A custom token is an RS256 assertion minted by a service account. It has no
//! `kid` header, so clients cannot verify it against the public Google keys; it
//! is only good for the exchange. The ID token returned by the exchange carries
//! the `kid` and is what clients send as a bearer credential.
//!
//! ## State
//!
//! Nothing is stored. The API key and the identity admin handle are loaded once at
//! startup into an [`api::AppContext`] shared by every request.

pub mod api;
pub mod cli;
pub mod identity;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
