//! Link management service
//!
//! Input validation and the link operations shared by the HTTP handlers and
//! the redirect path.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::{NyooomError, Result};
use crate::storage::{Database, Link};
use crate::utils::generate_random_string;
use crate::utils::url_validator::normalize_url;

pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 64;

/// 生成的 slug 撞上已有链接时的重试次数
const GENERATED_SLUG_ATTEMPTS: usize = 5;

/// Paths served by the application itself; a slug with one of these names
/// could never be reached.
pub const RESERVED_SLUGS: &[&str] = &[
    "api",
    "login",
    "logout",
    "dashboard",
    "create-account",
    "qr",
    "static",
    "health",
    "favicon.ico",
];

pub fn is_valid_slug(slug: &str) -> bool {
    (MIN_SLUG_LENGTH..=MAX_SLUG_LENGTH).contains(&slug.len())
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
}

/// A random slug that passes [`is_valid_slug`] and is not reserved.
///
/// `len` is clamped to the valid slug length range.
pub fn random_slug(len: usize) -> String {
    let len = len.clamp(MIN_SLUG_LENGTH, MAX_SLUG_LENGTH);
    loop {
        let slug = generate_random_string(len);
        if !is_reserved_slug(&slug) {
            return slug;
        }
    }
}

/// Validate user input and build a fresh [`Link`].
///
/// An empty slug is replaced with a random one of `random_len` characters.
/// The URL is normalised (a missing scheme becomes `https://`).
pub fn new_link(slug: &str, url: &str, random_len: usize) -> Result<Link> {
    let slug = slug.trim();
    let slug = if slug.is_empty() {
        random_slug(random_len)
    } else {
        if slug.chars().any(char::is_whitespace) {
            return Err(NyooomError::validation("Slug cannot contain spaces"));
        }
        if slug.len() < MIN_SLUG_LENGTH {
            return Err(NyooomError::validation(format!(
                "Slug must be at least {} characters",
                MIN_SLUG_LENGTH
            )));
        }
        if !is_valid_slug(slug) {
            return Err(NyooomError::validation(format!(
                "Invalid slug '{}'. Use up to {} letters, digits, '-' or '_'",
                slug, MAX_SLUG_LENGTH
            )));
        }
        if is_reserved_slug(slug) {
            return Err(NyooomError::validation(format!(
                "Slug '{}' conflicts with a reserved route",
                slug
            )));
        }
        slug.to_string()
    };

    let url = normalize_url(url).map_err(|e| NyooomError::validation(e.to_string()))?;

    Ok(Link::new(slug, url))
}

// ============ LinkService Implementation ============

/// Service for link management operations
pub struct LinkService {
    db: Arc<Database>,
    random_slug_length: usize,
}

impl LinkService {
    pub fn new(db: Arc<Database>, random_slug_length: usize) -> Self {
        Self {
            db,
            random_slug_length,
        }
    }

    /// Create a new short link. Taken slugs are a `Conflict`.
    ///
    /// A generated slug that happens to be taken is retried with a fresh one.
    pub async fn create_link(&self, slug: &str, url: &str) -> Result<Link> {
        if !slug.trim().is_empty() {
            let link = new_link(slug, url, self.random_slug_length)?;
            self.db.set_link(&link).await?;
            info!("LinkService: created link '{}' -> '{}'", link.slug, link.url);
            return Ok(link);
        }

        let len = self.random_slug_length;
        self.create_generated(url, || random_slug(len)).await
    }

    async fn create_generated<F>(&self, url: &str, mut next_slug: F) -> Result<Link>
    where
        F: FnMut() -> String,
    {
        let mut attempt = 1;
        loop {
            let link = new_link(&next_slug(), url, self.random_slug_length)?;
            match self.db.set_link(&link).await {
                Ok(()) => {
                    info!("LinkService: created link '{}' -> '{}'", link.slug, link.url);
                    return Ok(link);
                }
                Err(NyooomError::Conflict(_)) if attempt < GENERATED_SLUG_ATTEMPTS => {
                    debug!("Generated slug '{}' is taken, retrying", link.slug);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn delete_link(&self, slug: &str) -> Result<()> {
        if !self.db.delete_link(slug).await? {
            return Err(NyooomError::not_found(format!("Link '{}' not found", slug)));
        }
        info!("LinkService: deleted link '{}'", slug);
        Ok(())
    }

    pub async fn get_link(&self, slug: &str) -> Result<Link> {
        self.db
            .get_link(slug)
            .await?
            .ok_or_else(|| NyooomError::not_found(format!("Link '{}' not found", slug)))
    }

    pub async fn list_links(&self) -> Result<Vec<Link>> {
        self.db.get_links().await
    }

    /// Resolve a slug for a visitor and count the click.
    ///
    /// A failed increment is logged but does not block the redirect.
    pub async fn visit(&self, slug: &str) -> Result<Option<Link>> {
        let Some(mut link) = self.db.get_link(slug).await? else {
            return Ok(None);
        };
        match self.db.increment_clicks(slug).await {
            Ok(Some(clicks)) => link.clicks = clicks,
            // 读取之后被删除了
            Ok(None) => return Ok(None),
            Err(e) => warn!("Could not increment clicks for {}: {}", slug, e),
        }
        Ok(Some(link))
    }
}
