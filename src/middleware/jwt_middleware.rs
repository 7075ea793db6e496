/// JWT Authentication Middleware
///
/// Validates the bearer access token and injects the caller's identity
/// into request extensions for use by route handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use uuid::Uuid;

use crate::auth::authorize_access;
use crate::configuration::AuthSettings;
use crate::error::AppError;

/// Identity established from a valid access token
///
/// Handlers behind `JwtMiddleware` take it as `web::ReqData<AuthenticatedUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// JWT middleware for protecting routes
pub struct JwtMiddleware {
    auth_config: Rc<AuthSettings>,
}

impl JwtMiddleware {
    pub fn new(auth_config: AuthSettings) -> Self {
        Self {
            auth_config: Rc::new(auth_config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            auth_config: self.auth_config.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    auth_config: Rc<AuthSettings>,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorize_access(req.headers(), &self.auth_config) {
            Ok(user_id) => {
                req.extensions_mut().insert(AuthenticatedUser { user_id });
                tracing::debug!(user_id = %user_id, "Access token validated");

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                // Rendered by AppError's ResponseError impl
                let error: Error = AppError::from(e).into();
                Box::pin(async move { Err(error) })
            }
        }
    }
}
