use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::models::ApiError;

pub const SESSION_HEADER: &str = "x-session-user";

/// Explicit per-request auth context. Mutating handlers take this as an
/// argument instead of reading ambient session state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
}

impl FromRequest for SessionContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        ready(match user_id {
            Some(user_id) => Ok(SessionContext { user_id }),
            None => Err(ApiError::Unauthorized(format!(
                "Missing {} header",
                SESSION_HEADER
            ))),
        })
    }
}
