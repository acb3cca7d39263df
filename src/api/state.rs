//! Shared handler state

use std::sync::Arc;

use actix_web::HttpRequest;

use crate::api::jwt::{JwtService, SessionClaims};
use crate::api::services::helpers::{CookieBuilder, base_url, extract_session_token};
use crate::config::StaticConfig;
use crate::services::LinkService;
use crate::storage::Database;

/// Everything a request handler needs, registered once as `web::Data`.
pub struct AppState {
    pub db: Arc<Database>,
    pub links: LinkService,
    pub jwt: Arc<JwtService>,
    pub cookies: CookieBuilder,
    pub config: Arc<StaticConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtService>, config: Arc<StaticConfig>) -> Self {
        Self {
            links: LinkService::new(db.clone(), config.links.random_slug_length),
            cookies: CookieBuilder::from_auth_config(&config.auth),
            db,
            jwt,
            config,
        }
    }

    /// Claims of the request's session, if it carries a valid one.
    pub fn session(&self, req: &HttpRequest) -> Option<SessionClaims> {
        extract_session_token(req).and_then(|token| self.jwt.validate_token(&token))
    }

    /// Prefix for short URLs handed back to clients
    pub fn base_url(&self, req: &HttpRequest) -> String {
        base_url(req, self.config.server.public_url.as_deref())
    }
}
