use crate::{
    api::{
        AppContext, ApiError,
        handlers::{UidRequest, requested_uid},
    },
    identity::resolve_uid,
};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path = "/getAuthToken",
    request_body = UidRequest,
    responses (
        (status = 200, description = "Raw ID token", body = String, content_type = "text/plain"),
        (status = 500, description = "Custom token signing or the exchange failed", body = String),
    ),
    tag = "idmint",
)]
#[instrument(skip(context, payload))]
pub async fn get_auth_token(
    Extension(context): Extension<AppContext>,
    payload: Result<Json<UidRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let uid = resolve_uid(requested_uid(payload)?);

    let custom_token = context.admin().create_custom_token(&uid).await?;
    debug!("Minted custom token for {}", uid);

    // An exchange response without idToken is answered with an empty 200.
    let id_token = context.exchange().exchange(&custom_token).await?;

    Ok(id_token.unwrap_or_default())
}
