//! Redis / Valkey backend
//!
//! 使用 `ConnectionManager`（多路复用 + 自动重连）作为共享连接，
//! 所有 worker 共用同一个实例，每次调用 clone 一份句柄即可。

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::errors::{NyooomError, Result};
use crate::storage::KvStore;

pub struct RedisStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Connect to the store described by `config` and verify it answers PING.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_url()).map_err(|e| {
            NyooomError::store_connection(format!(
                "Invalid store address {}:{}: {}",
                config.address, config.port, e
            ))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            NyooomError::store_connection(format!(
                "Failed to connect to store at {}:{}: {}",
                config.address, config.port, e
            ))
        })?;

        let store = Self {
            connection,
            key_prefix: config.key_prefix.clone(),
        };
        store.ping().await?;

        debug!(
            "RedisStore connected to {}:{} (db {}, prefix '{}')",
            config.address, config.port, config.database, config.key_prefix
        );
        Ok(store)
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn conn(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let exists: bool = self.conn().exists(self.make_key(key)).await?;
        Ok(exists)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self.conn().get(self.make_key(key)).await?;
        trace!("GET {} -> {}", key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn();
        match ttl {
            // SET EX 只接受整数秒，至少 1 秒
            Some(ttl) => {
                conn.set_ex::<String, &str, ()>(redis_key, value, ttl.as_secs().max(1))
                    .await?
            }
            None => conn.set::<String, &str, ()>(redis_key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let deleted: i64 = self.conn().del(self.make_key(key)).await?;
        Ok(deleted > 0)
    }

    async fn set_hash(&self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.conn()
            .hset_multiple::<String, &str, String, ()>(self.make_key(key), fields)
            .await?;
        Ok(())
    }

    async fn get_hash(&self, key: &str) -> Result<HashMap<String, String>> {
        let hash: HashMap<String, String> = self.conn().hgetall(self.make_key(key)).await?;
        Ok(hash)
    }

    async fn increment_hash_field(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        let value: i64 = self.conn().hincr(self.make_key(key), field, delta).await?;
        Ok(value)
    }

    async fn add_to_list(&self, key: &str, value: &str) -> Result<()> {
        self.conn()
            .lpush::<String, &str, ()>(self.make_key(key), value)
            .await?;
        Ok(())
    }

    async fn remove_from_list(&self, key: &str, value: &str) -> Result<bool> {
        let removed: i64 = self.conn().lrem(self.make_key(key), 1, value).await?;
        Ok(removed > 0)
    }

    async fn get_list(&self, key: &str) -> Result<Vec<String>> {
        let list: Vec<String> = self.conn().lrange(self.make_key(key), 0, -1).await?;
        Ok(list)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn();
        let response: String = redis::cmd("PING").query_async(&mut conn).await?;
        trace!("PING -> {}", response);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
