//! HTML 页面和静态资源

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use rust_embed::Embed;
use tracing::{debug, error, trace};

use crate::api::state::AppState;

use super::helpers::redirect_response;

// 使用 RustEmbed 自动嵌入静态文件
#[derive(Embed)]
#[folder = "static/"]
struct PageAssets;

pub struct PageService;

impl PageService {
    fn serve_page(name: &str) -> HttpResponse {
        match PageAssets::get(name) {
            Some(content) => {
                let html = String::from_utf8_lossy(&content.data)
                    .replace("%NYOOOM_VERSION%", env!("CARGO_PKG_VERSION"));
                HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .insert_header(("Cache-Control", "no-store"))
                    .body(html)
            }
            None => {
                error!("Embedded page {} is missing", name);
                HttpResponse::InternalServerError().body("Page not found")
            }
        }
    }

    /// GET /login
    pub async fn login_page(state: web::Data<AppState>) -> impl Responder {
        match state.db.user_exists().await {
            Ok(true) => Self::serve_page("login.html"),
            Ok(false) => redirect_response(StatusCode::FOUND, "/create-account"),
            Err(e) => {
                error!("Could not check if account exists: {}", e);
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }

    /// GET /create-account
    pub async fn create_account_page(state: web::Data<AppState>) -> impl Responder {
        match state.db.user_exists().await {
            Ok(false) => Self::serve_page("create-account.html"),
            Ok(true) => redirect_response(StatusCode::FOUND, "/login"),
            Err(e) => {
                error!("Could not check if account exists: {}", e);
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }

    /// GET /dashboard
    pub async fn dashboard_page(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
        if state.session(&req).is_none() {
            debug!("Dashboard requested without a valid session");
            return redirect_response(StatusCode::FOUND, "/login");
        }
        Self::serve_page("dashboard.html")
    }

    /// GET /static/{path}
    pub async fn handle_static(req: HttpRequest) -> impl Responder {
        let path = req.match_info().query("path");
        trace!("Serving static file: {}", path);

        // 页面只能通过各自的路由访问
        if path.ends_with(".html") {
            return HttpResponse::NotFound().body("File not found");
        }

        match PageAssets::get(path) {
            Some(content) => HttpResponse::Ok()
                .content_type(Self::get_content_type(path))
                .insert_header(("Cache-Control", "public, max-age=3600"))
                .body(content.data.into_owned()),
            None => {
                debug!("Static file not found: {}", path);
                HttpResponse::NotFound().body("File not found")
            }
        }
    }

    /// 根据文件扩展名确定 Content-Type
    fn get_content_type(path: &str) -> &'static str {
        match path.split('.').next_back() {
            Some("css") => "text/css; charset=utf-8",
            Some("js") => "application/javascript; charset=utf-8",
            Some("png") => "image/png",
            Some("svg") => "image/svg+xml",
            Some("ico") => "image/x-icon",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_embedded() {
        for page in ["login.html", "create-account.html", "dashboard.html"] {
            assert!(PageAssets::get(page).is_some(), "{page}");
        }
        assert!(PageAssets::get("app.css").is_some());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(
            PageService::get_content_type("dashboard.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(
            PageService::get_content_type("unknown.bin"),
            "application/octet-stream"
        );
    }
}
