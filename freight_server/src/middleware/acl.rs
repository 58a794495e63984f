//! Access control list middleware for the freight server.
//! This middleware can be placed on any route or service inside the `/api` scope.
//!
//! It reads the [`Caller`] attached by the identity middleware and checks the caller's role against the roles the
//! route accepts. If the role is accepted, the request is allowed to continue. Otherwise, a 403 Forbidden response is
//! returned.
use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use freight_engine::db_types::Role;
use futures::future::{ok, Ready};

use crate::{auth::Caller, errors::ServerError};

pub struct AclMiddlewareFactory {
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed_roles = self.allowed_roles.clone();
        Box::pin(async move {
            let caller = req.extensions().get::<Caller>().copied().ok_or_else(|| {
                log::warn!("💻️ No caller identity found in request extensions");
                ServerError::Unauthenticated("No caller identity found.".into())
            })?;
            if allowed_roles.contains(&caller.role) {
                service.call(req).await
            } else {
                log::debug!("💻️ A {} may not call {}", caller.role, req.path());
                Err(ServerError::InsufficientPermissions(format!("This action is not available to a {}.", caller.role))
                    .into())
            }
        })
    }
}
