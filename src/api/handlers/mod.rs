pub mod health;
pub use self::health::health;

pub mod register_user;
pub use self::register_user::register_user;

pub mod get_auth_token;
pub use self::get_auth_token::get_auth_token;

// common types for the handlers
use crate::identity::IdentityError;
use axum::{Json, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct UidRequest {
    /// Account uid, `max-mustermann-uid` when omitted
    #[schema(value_type = Option<String>)]
    uid: Option<Value>,
}

/// Extract the requested uid.
///
/// A missing or unparsable body, a missing field and `null` count as no uid.
/// # Errors
/// Returns an invalid-argument error if `uid` is present but not a string.
pub fn requested_uid(
    payload: Result<Json<UidRequest>, JsonRejection>,
) -> Result<Option<String>, IdentityError> {
    match payload {
        Ok(Json(UidRequest { uid: None })) => Ok(None),
        Ok(Json(UidRequest {
            uid: Some(Value::String(uid)),
        })) => Ok(Some(uid)),
        Ok(Json(UidRequest { uid: Some(other) })) => Err(IdentityError::InvalidArgument(
            format!("uid must be a string, got {other}"),
        )),
        Err(rejection) => {
            debug!("Ignoring request body: {}", rejection.body_text());
            Ok(None)
        }
    }
}
