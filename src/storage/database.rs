//! Link, account and secret operations built on top of [`KvStore`]
//!
//! 键布局（前缀由后端统一添加）：
//! - `version`          schema 版本号
//! - `links`            slug 列表（LPUSH，最新的在前）
//! - `link:<slug>`      链接哈希（url / clicks / created_at）
//! - `user`             账户密码的 Argon2 哈希
//! - `jwt-secret`       会话签名密钥

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::errors::{NyooomError, Result};
use crate::storage::{KvStore, Link};

/// Version the current code writes and expects.
pub const SCHEMA_VERSION: &str = "1";

const VERSION_KEY: &str = "version";
const LINKS_KEY: &str = "links";
const USER_KEY: &str = "user";
const JWT_SECRET_KEY: &str = "jwt-secret";

fn link_key(slug: &str) -> String {
    format!("link:{}", slug)
}

/// Outcome of the startup version check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    UpToDate,
    /// No marker was present; it has been written.
    Initialized,
    /// A different marker was present; it has been overwritten.
    Replaced { previous: String },
}

#[derive(Clone)]
pub struct Database {
    store: Arc<dyn KvStore>,
}

impl Database {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // ============================================================
    // Version marker
    // ============================================================

    pub async fn get_version(&self) -> Result<Option<String>> {
        self.store.get(VERSION_KEY).await
    }

    pub async fn set_version(&self, version: &str) -> Result<()> {
        self.store.set(VERSION_KEY, version, None).await
    }

    /// 启动时检查版本号，仅用于日志提示，不做任何迁移
    pub async fn check_version(&self) -> Result<VersionCheck> {
        match self.get_version().await? {
            Some(current) if current == SCHEMA_VERSION => {
                debug!("Store schema version {} is up to date", current);
                Ok(VersionCheck::UpToDate)
            }
            Some(current) => {
                warn!(
                    "Store schema version is {}, expected {}. Overwriting the marker (no migration is performed)",
                    current, SCHEMA_VERSION
                );
                self.set_version(SCHEMA_VERSION).await?;
                Ok(VersionCheck::Replaced { previous: current })
            }
            None => {
                info!(
                    "No schema version found, setting version to {}",
                    SCHEMA_VERSION
                );
                self.set_version(SCHEMA_VERSION).await?;
                Ok(VersionCheck::Initialized)
            }
        }
    }

    // ============================================================
    // Links
    // ============================================================

    /// Store a new link. Fails with `Conflict` if the slug is taken.
    ///
    /// A hash left behind without a `url` field does not count as taken
    /// and is replaced.
    pub async fn set_link(&self, link: &Link) -> Result<()> {
        let key = link_key(&link.slug);
        let existing = self.store.get_hash(&key).await?;
        if existing.contains_key(Link::FIELD_URL) {
            return Err(NyooomError::conflict(format!(
                "Link {} already exists",
                link.slug
            )));
        }
        if !existing.is_empty() {
            warn!("Replacing stale entry for link {}", link.slug);
            self.store.delete(&key).await?;
        }

        self.store.set_hash(&key, &link.to_fields()).await?;
        self.store
            .add_to_list(LINKS_KEY, &link.slug)
            .await
            .map_err(|e| {
                NyooomError::store_operation(format!(
                    "Could not add link {} to links list: {}",
                    link.slug,
                    e.message()
                ))
            })?;
        Ok(())
    }

    pub async fn get_link(&self, slug: &str) -> Result<Option<Link>> {
        let hash = self.store.get_hash(&link_key(slug)).await?;
        if hash.is_empty() {
            return Ok(None);
        }
        if !hash.contains_key(Link::FIELD_URL) {
            debug!("Link {} has no url field, treating it as absent", slug);
            return Ok(None);
        }
        Self::link_from_hash(slug, hash).map(Some)
    }

    fn link_from_hash(slug: &str, mut hash: HashMap<String, String>) -> Result<Link> {
        let url = hash.remove(Link::FIELD_URL).ok_or_else(|| {
            NyooomError::serialization(format!("Link {} has no url field", slug))
        })?;

        let clicks = match hash.get(Link::FIELD_CLICKS) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                NyooomError::serialization(format!(
                    "Could not get clicks for link {}: {}",
                    slug, e
                ))
            })?,
            None => 0,
        };

        // 旧数据可能没有 created_at，解析失败也只当作未知
        let created_at = hash
            .get(Link::FIELD_CREATED_AT)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Link {
            slug: slug.to_string(),
            url,
            clicks,
            created_at,
        })
    }

    /// Remove a link. Returns `false` when the slug did not exist.
    pub async fn delete_link(&self, slug: &str) -> Result<bool> {
        let deleted = self.store.delete(&link_key(slug)).await?;
        let unlisted = self.store.remove_from_list(LINKS_KEY, slug).await?;
        if deleted != unlisted {
            warn!(
                "Link {} was only partially present (hash: {}, list entry: {})",
                slug, deleted, unlisted
            );
        }
        Ok(deleted || unlisted)
    }

    pub async fn get_link_slugs(&self) -> Result<Vec<String>> {
        self.store.get_list(LINKS_KEY).await
    }

    /// All links, newest first. Entries that cannot be loaded are logged
    /// and skipped.
    pub async fn get_links(&self) -> Result<Vec<Link>> {
        let slugs = self.get_link_slugs().await?;
        let mut links = Vec::with_capacity(slugs.len());
        for slug in slugs {
            match self.get_link(&slug).await {
                Ok(Some(link)) => links.push(link),
                Ok(None) => warn!("Links list references missing link {}", slug),
                Err(e) => warn!("Failed to get link for {}: {}", slug, e),
            }
        }
        Ok(links)
    }

    /// Bump the click counter of an existing link and return the new count.
    ///
    /// Returns `None` without writing anything when the link is gone, so a
    /// visit racing a delete cannot resurrect the key.
    pub async fn increment_clicks(&self, slug: &str) -> Result<Option<u64>> {
        let key = link_key(slug);
        if !self.store.exists(&key).await? {
            return Ok(None);
        }
        let count = self
            .store
            .increment_hash_field(&key, Link::FIELD_CLICKS, 1)
            .await?;
        u64::try_from(count).map(Some).map_err(|_| {
            NyooomError::serialization(format!("Negative click count for link {}", slug))
        })
    }

    // ============================================================
    // Account
    // ============================================================

    pub async fn user_exists(&self) -> Result<bool> {
        self.store.exists(USER_KEY).await
    }

    /// The stored password hash, if an account exists.
    pub async fn get_user(&self) -> Result<Option<String>> {
        self.store.get(USER_KEY).await
    }

    pub async fn set_user(&self, password_hash: &str) -> Result<()> {
        self.store.set(USER_KEY, password_hash, None).await
    }

    // ============================================================
    // Session secret
    // ============================================================

    pub async fn get_jwt_secret(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(JWT_SECRET_KEY)
            .await?
            .filter(|s| !s.is_empty()))
    }

    pub async fn set_jwt_secret(&self, secret: &str) -> Result<()> {
        self.store.set(JWT_SECRET_KEY, secret, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn db() -> (Database, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Database::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_version_marker_lifecycle() {
        let (db, _) = db();
        assert_eq!(db.check_version().await.unwrap(), VersionCheck::Initialized);
        assert_eq!(db.get_version().await.unwrap().as_deref(), Some("1"));
        assert_eq!(db.check_version().await.unwrap(), VersionCheck::UpToDate);

        db.set_version("0").await.unwrap();
        assert_eq!(
            db.check_version().await.unwrap(),
            VersionCheck::Replaced {
                previous: "0".to_string()
            }
        );
        assert_eq!(db.get_version().await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_set_and_get_link() {
        let (db, _) = db();
        let link = Link::new("docs", "https://docs.rs");
        db.set_link(&link).await.unwrap();

        let loaded = db.get_link("docs").await.unwrap().expect("link exists");
        assert_eq!(loaded.url, "https://docs.rs");
        assert_eq!(loaded.clicks, 0);
        assert!(loaded.created_at.is_some());
        assert_eq!(db.get_link_slugs().await.unwrap(), vec!["docs"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let (db, _) = db();
        db.set_link(&Link::new("dup", "https://a.com")).await.unwrap();
        let err = db
            .set_link(&Link::new("dup", "https://b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, NyooomError::Conflict(_)));

        // 原链接不受影响，列表中也没有重复项
        let link = db.get_link("dup").await.unwrap().unwrap();
        assert_eq!(link.url, "https://a.com");
        assert_eq!(db.get_link_slugs().await.unwrap(), vec!["dup"]);
    }

    #[tokio::test]
    async fn test_delete_link() {
        let (db, store) = db();
        db.set_link(&Link::new("tmp", "https://a.com")).await.unwrap();
        assert!(db.delete_link("tmp").await.unwrap());
        assert!(db.get_link("tmp").await.unwrap().is_none());
        assert!(db.get_link_slugs().await.unwrap().is_empty());
        assert!(!db.delete_link("tmp").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_links_newest_first_and_skips_dangling() {
        let (db, store) = db();
        db.set_link(&Link::new("one", "https://one.com")).await.unwrap();
        db.set_link(&Link::new("two", "https://two.com")).await.unwrap();
        store.add_to_list("links", "ghost").await.unwrap();
        store
            .set_hash("link:broken", &[("url", "https://x.com".to_string())])
            .await
            .unwrap();
        store
            .set_hash("link:broken", &[("clicks", "lots".to_string())])
            .await
            .unwrap();
        store.add_to_list("links", "broken").await.unwrap();

        let links = db.get_links().await.unwrap();
        let slugs: Vec<&str> = links.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(slugs, vec!["two", "one"]);
    }

    #[tokio::test]
    async fn test_get_link_with_bad_clicks_is_error() {
        let (db, store) = db();
        store
            .set_hash(
                "link:bad",
                &[("url", "https://x.com".to_string()), ("clicks", "x".to_string())],
            )
            .await
            .unwrap();
        assert!(matches!(
            db.get_link("bad").await,
            Err(NyooomError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_increment_clicks() {
        let (db, _) = db();
        db.set_link(&Link::new("hot", "https://a.com")).await.unwrap();
        assert_eq!(db.increment_clicks("hot").await.unwrap(), Some(1));
        assert_eq!(db.increment_clicks("hot").await.unwrap(), Some(2));
        assert_eq!(db.get_link("hot").await.unwrap().unwrap().clicks, 2);
    }

    #[tokio::test]
    async fn test_user_and_secret() {
        let (db, _) = db();
        assert!(!db.user_exists().await.unwrap());
        assert!(db.get_user().await.unwrap().is_none());

        db.set_user("$argon2id$fake").await.unwrap();
        assert!(db.user_exists().await.unwrap());
        assert_eq!(db.get_user().await.unwrap().as_deref(), Some("$argon2id$fake"));

        assert!(db.get_jwt_secret().await.unwrap().is_none());
        db.set_jwt_secret("abc").await.unwrap();
        assert_eq!(db.get_jwt_secret().await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_legacy_link_without_created_at() {
        let (db, store) = db();
        store
            .set_hash(
                "link:old",
                &[("url", "https://old.com".to_string()), ("clicks", "7".to_string())],
            )
            .await
            .unwrap();
        let link = db.get_link("old").await.unwrap().unwrap();
        assert_eq!(link.clicks, 7);
        assert!(link.created_at.is_none());
    }

    #[tokio::test]
    async fn test_increment_after_delete_does_not_recreate() {
        let (db, store) = db();
        db.set_link(&Link::new("race", "https://a.com")).await.unwrap();
        assert!(db.delete_link("race").await.unwrap());

        assert_eq!(db.increment_clicks("race").await.unwrap(), None);
        assert!(store.is_empty());

        db.set_link(&Link::new("race", "https://b.com")).await.unwrap();
        let link = db.get_link("race").await.unwrap().unwrap();
        assert_eq!(link.url, "https://b.com");
        assert_eq!(link.clicks, 0);
        assert_eq!(db.get_link_slugs().await.unwrap(), vec!["race"]);
    }

    #[tokio::test]
    async fn test_stale_hash_without_url_is_absent_and_reusable() {
        let (db, store) = db();
        store
            .set_hash("link:stale", &[("clicks", "1".to_string())])
            .await
            .unwrap();

        assert!(db.get_link("stale").await.unwrap().is_none());

        db.set_link(&Link::new("stale", "https://fresh.com")).await.unwrap();
        let link = db.get_link("stale").await.unwrap().unwrap();
        assert_eq!(link.url, "https://fresh.com");
        assert_eq!(link.clicks, 0);
    }
}
