use crate::{
    api::{
        AppContext, ApiError,
        handlers::{UidRequest, requested_uid},
    },
    identity::{UserProfile, resolve_uid},
};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{info, instrument};

#[utoipa::path(
    post,
    path = "/registerUser",
    request_body = UidRequest,
    responses (
        (status = 200, description = "Test user created"),
        (status = 500, description = "The identity provider rejected the user, e.g. the uid already exists", body = String),
    ),
    tag = "idmint",
)]
#[instrument(skip(context, payload))]
pub async fn register_user(
    Extension(context): Extension<AppContext>,
    payload: Result<Json<UidRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let uid = resolve_uid(requested_uid(payload)?);
    let profile = UserProfile::test_user(uid);

    context.admin().create_user(&profile).await?;

    info!("Registered test user {}", profile.uid);

    Ok(StatusCode::OK)
}
