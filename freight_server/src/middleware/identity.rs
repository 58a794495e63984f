//! Identity middleware for the `/api` scope.
//!
//! Reads the identity headers forwarded by the authenticating gateway and stores the resulting [`Caller`] in the
//! request extensions. Requests without a valid identity are rejected with 401 Unauthorized before they reach a
//! handler.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};

use crate::auth::Caller;

#[derive(Default)]
pub struct IdentityMiddlewareFactory;

impl IdentityMiddlewareFactory {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = IdentityMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService { service: Rc::new(service) }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let caller = Caller::from_headers(req.headers()).map_err(|e| {
                warn!("💻️ Rejecting request to {}. {e}", req.path());
                e
            })?;
            trace!("💻️ Request from account {} ({})", caller.account_id, caller.role);
            req.extensions_mut().insert(caller);
            service.call(req).await
        })
    }
}
