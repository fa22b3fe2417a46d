use crate::{
    APP_USER_AGENT,
    api::handlers::health,
    cli::globals::GlobalArgs,
    identity::{IdentityAdmin, ServiceAccountAdmin, TokenExchangeClient},
};
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::options,
};
use reqwest::Client;
use std::{fmt, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, debug_span, info};
use ulid::Ulid;

mod error;
pub mod handlers;
mod openapi;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::error::ApiError;
pub use self::openapi::openapi;

/// Process-wide state shared by every request. Built once, never mutated.
#[derive(Clone)]
pub struct AppContext {
    admin: Arc<dyn IdentityAdmin>,
    exchange: TokenExchangeClient,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    #[must_use]
    pub fn new(admin: Arc<dyn IdentityAdmin>, exchange: TokenExchangeClient) -> Self {
        Self { admin, exchange }
    }

    /// Wire the service account admin and the exchange client from startup config.
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the configured URLs are invalid.
    pub fn from_globals(globals: &GlobalArgs) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let admin = ServiceAccountAdmin::new(
            client.clone(),
            globals.service_account.clone(),
            &globals.identity_toolkit_url,
        )
        .context("Failed to initialize identity admin")?;

        let exchange = TokenExchangeClient::new(
            client,
            &globals.relying_party_url,
            globals.api_key.clone(),
        )
        .context("Failed to initialize token exchange client")?;

        Ok(Self::new(Arc::new(admin), exchange))
    }

    #[must_use]
    pub fn admin(&self) -> &dyn IdentityAdmin {
        self.admin.as_ref()
    }

    #[must_use]
    pub const fn exchange(&self) -> &TokenExchangeClient {
        &self.exchange
    }
}

/// Full application router: documented routes, probes and middleware.
pub fn app(context: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    let (router, _openapi) = openapi::api_router().split_for_parts();

    router.route("/health", options(health::health)).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors)
            .layer(Extension(context)),
    )
}

/// router
/// # Errors
/// Returns an error if the context cannot be built or the server fails to start
pub async fn new(port: u16, globals: &GlobalArgs) -> Result<()> {
    let context = AppContext::from_globals(globals)?;

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app(context).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}
