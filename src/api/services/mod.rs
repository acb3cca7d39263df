pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod links;
pub mod pages;
pub mod qrcode;
pub mod redirect;
pub mod types;

use actix_web::middleware::Condition;
use actix_web::web;

use crate::api::middleware::SessionAuth;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService};
pub use pages::PageService;
pub use redirect::RedirectService;
pub use types::ApiResponse;

/// Register every route of the service.
///
/// Order matters: the catch-all `/{slug}` must come last.
pub fn configure_routes(cfg: &mut web::ServiceConfig, login_rate_limit: bool) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/", web::get().to(RedirectService::handle_root))
        .route("/login", web::get().to(PageService::login_page))
        .route(
            "/create-account",
            web::get().to(PageService::create_account_page),
        )
        .route("/dashboard", web::get().to(PageService::dashboard_page))
        .route(
            "/static/{path:.*}",
            web::get().to(PageService::handle_static),
        )
        .route("/qr/{slug}", web::get().to(qrcode::qr_code))
        .service(
            web::scope("/api")
                .wrap(SessionAuth)
                .service(
                    web::resource("/login")
                        .wrap(Condition::new(login_rate_limit, auth::login_rate_limiter()))
                        .route(web::post().to(auth::login)),
                )
                .route("/jwt-login", web::post().to(auth::jwt_login))
                .route("/create-account", web::post().to(auth::create_account))
                .route("/logout", web::post().to(auth::logout))
                .route("/create-link", web::post().to(links::create_link))
                .route("/delete-link", web::post().to(links::delete_link_by_query))
                .route("/links", web::get().to(links::list_links))
                .service(
                    web::resource("/links/{slug}")
                        .route(web::get().to(links::get_link))
                        .route(web::delete().to(links::delete_link)),
                ),
        )
        .service(
            web::resource("/{slug}")
                .route(web::get().to(RedirectService::handle_redirect))
                .route(web::head().to(RedirectService::handle_redirect)),
        );
}
