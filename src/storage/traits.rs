use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// Primitive key-value commands the rest of the service is written against.
///
/// Keys are logical names such as `links` or `link:abc`; backends are
/// responsible for applying the configured key prefix. Every method maps to
/// a single store command, so atomicity is exactly what the store provides
/// for that command.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `ttl = None` stores the value without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Returns `true` when a key was actually removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn set_hash(&self, key: &str, fields: &[(&str, String)]) -> Result<()>;

    /// Missing keys yield an empty map.
    async fn get_hash(&self, key: &str) -> Result<HashMap<String, String>>;

    /// Atomically adds `delta` to an integer hash field and returns the new value.
    async fn increment_hash_field(&self, key: &str, field: &str, delta: i64) -> Result<i64>;

    /// Pushes onto the head of the list.
    async fn add_to_list(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the first occurrence of `value`; `true` if one was found.
    async fn remove_from_list(&self, key: &str, value: &str) -> Result<bool>;

    async fn get_list(&self, key: &str) -> Result<Vec<String>>;

    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
