//! Session authentication middleware for `/api`

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::CONTENT_TYPE,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{error, info, trace};

use crate::api::services::error_code::ErrorCode;
use crate::api::services::helpers::extract_session_token;
use crate::api::services::types::ApiResponse;
use crate::api::state::AppState;

/// Endpoints reachable without a session
const PUBLIC_API_PATHS: &[&str] = &[
    "/api/login",
    "/api/jwt-login",
    "/api/create-account",
    "/api/logout",
];

/// Session authentication middleware
#[derive(Clone, Default)]
pub struct SessionAuth;

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!(
            "Session authentication failed for {} - invalid or missing token",
            req.path()
        );
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing session".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    fn is_public_endpoint(req: &ServiceRequest) -> bool {
        let path = req.path().trim_end_matches('/');
        PUBLIC_API_PATHS.contains(&path)
    }
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            if Self::is_public_endpoint(&req) {
                trace!("Public endpoint {} - bypassing authentication", req.path());
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!("AppState is not registered, rejecting {}", req.path());
                return Ok(Self::handle_unauthorized(req));
            };

            let claims = extract_session_token(req.request())
                .and_then(|token| state.jwt.validate_token(&token));

            match claims {
                Some(claims) => {
                    trace!("Session authentication successful");
                    // handler 可以通过 extensions 读取 claims
                    req.extensions_mut().insert(claims);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                None => Ok(Self::handle_unauthorized(req)),
            }
        })
    }
}
