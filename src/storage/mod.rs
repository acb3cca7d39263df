pub mod backend;
pub mod database;
pub mod models;
pub mod traits;

pub use backend::{MemoryStore, RedisStore, create_store};
pub use database::{Database, SCHEMA_VERSION, VersionCheck};
pub use models::Link;
pub use traits::KvStore;
