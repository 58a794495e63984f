use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use freight_engine::db_types::Role;
use log::debug;
use serde_json::Value;

use crate::auth::{Caller, ACCOUNT_ID_HEADER, ACCOUNT_ROLE_HEADER};

pub fn shipper(account_id: i64) -> Option<Caller> {
    Some(Caller::new(account_id, Role::Shipper))
}

pub fn carrier(account_id: i64) -> Option<Caller> {
    Some(Caller::new(account_id, Role::Carrier))
}

fn with_identity(mut req: TestRequest, caller: Option<Caller>) -> TestRequest {
    if let Some(caller) = caller {
        req = req
            .insert_header((ACCOUNT_ID_HEADER, caller.account_id.to_string()))
            .insert_header((ACCOUNT_ROLE_HEADER, caller.role.to_string()));
    }
    req
}

/// Builds a fresh app from `configure` and sends a single request to it. Errors raised by middleware are rendered
/// the way the server would render them.
pub async fn send(req: TestRequest, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    let res = match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => res.map_into_boxed_body().into_parts().1,
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let body = res.into_body().try_into_bytes().map(|b| String::from_utf8_lossy(&b).into_owned()).unwrap_or_default();
    (status, body)
}

pub async fn get_request(
    caller: Option<Caller>,
    path: &str,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    send(with_identity(TestRequest::get().uri(path), caller), configure).await
}

pub async fn post_request(
    caller: Option<Caller>,
    path: &str,
    body: &Value,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    send(with_identity(TestRequest::post().uri(path).set_json(body), caller), configure).await
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response is not JSON. {e}: {body}"))
}
