//! Store backends
//!
//! `redis` talks to a Redis/Valkey server, `memory` keeps everything in
//! process.

pub mod memory;
pub mod redis;

use std::sync::Arc;

use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::Result;
use crate::storage::KvStore;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// 根据配置创建存储后端
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match config.backend {
        StoreBackend::Redis => Arc::new(RedisStore::connect(config).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!("Using {} store backend", store.backend_name());
    Ok(store)
}
