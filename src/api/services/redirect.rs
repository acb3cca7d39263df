//! 根路径和短链接跳转

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use crate::api::state::AppState;
use crate::services::is_valid_slug;

use super::helpers::redirect_response;

pub struct RedirectService;

impl RedirectService {
    /// GET /
    ///
    /// 没有账户时去创建账户，未登录去登录页，否则进入仪表盘
    pub async fn handle_root(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
        match state.db.user_exists().await {
            Ok(false) => redirect_response(StatusCode::TEMPORARY_REDIRECT, "/create-account"),
            Ok(true) if state.session(&req).is_none() => {
                redirect_response(StatusCode::TEMPORARY_REDIRECT, "/login")
            }
            Ok(true) => redirect_response(StatusCode::TEMPORARY_REDIRECT, "/dashboard"),
            Err(e) => {
                error!("Could not check if account exists: {}", e);
                Self::error_response()
            }
        }
    }

    /// GET|HEAD /{slug}
    pub async fn handle_redirect(
        path: web::Path<String>,
        state: web::Data<AppState>,
    ) -> impl Responder {
        let slug = path.into_inner();

        if !is_valid_slug(&slug) {
            trace!("Invalid slug rejected: {}", &slug);
            return Self::not_found_response();
        }

        match state.links.visit(&slug).await {
            Ok(Some(link)) => {
                debug!("Redirecting {}", link);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", link.url))
                    .insert_header(("Cache-Control", "no-store"))
                    .finish()
            }
            Ok(None) => {
                debug!("Redirect link not found: {}", &slug);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Store error during redirect lookup for {}: {}", &slug, e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}
