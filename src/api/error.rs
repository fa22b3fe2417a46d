use crate::identity::{ExchangeError, IdentityError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::{error::Error as StdError, fmt::Write};
use thiserror::Error;
use tracing::error;

/// Failure of a request handler. Every variant is answered with a bare 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", error_chain(&self));

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
            .into_response()
    }
}

fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(message, ": {cause}");
        source = cause.source();
    }
    message
}
