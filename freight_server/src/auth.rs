//! Caller identity.
//!
//! Authentication happens upstream of this server. The gateway forwards the authenticated account id and role in the
//! [`ACCOUNT_ID_HEADER`] and [`ACCOUNT_ROLE_HEADER`] headers. The [`IdentityMiddlewareFactory`] turns them into a
//! [`Caller`], which handlers receive as an extractor.
//!
//! [`IdentityMiddlewareFactory`]: crate::middleware::IdentityMiddlewareFactory
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::HeaderMap, FromRequest, HttpMessage, HttpRequest};
use freight_engine::db_types::Role;
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

pub const ACCOUNT_ID_HEADER: &str = "fms_account_id";
pub const ACCOUNT_ROLE_HEADER: &str = "fms_account_role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub account_id: i64,
    pub role: Role,
}

impl Caller {
    pub fn new(account_id: i64, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ServerError> {
        let account_id = header_value(headers, ACCOUNT_ID_HEADER)?
            .parse::<i64>()
            .map_err(|e| ServerError::Unauthenticated(format!("{ACCOUNT_ID_HEADER} is not a valid account id. {e}")))?;
        let role = header_value(headers, ACCOUNT_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|e| ServerError::Unauthenticated(format!("{ACCOUNT_ROLE_HEADER} is not a valid role. {e}")))?;
        Ok(Self { account_id, role })
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ServerError> {
    headers
        .get(name)
        .ok_or_else(|| ServerError::Unauthenticated(format!("The {name} header is missing.")))?
        .to_str()
        .map(str::trim)
        .map_err(|e| ServerError::Unauthenticated(format!("The {name} header is not readable. {e}")))
}

impl FromRequest for Caller {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let caller = req
            .extensions()
            .get::<Caller>()
            .copied()
            .ok_or_else(|| ServerError::Unauthenticated("No caller identity was attached to the request.".into()));
        ready(caller)
    }
}
