//! In-process store
//!
//! Mirrors the subset of Redis semantics the service relies on. Used by the
//! test-suite and for running without an external store
//! (`store.backend = "memory"`). Nothing is persisted.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::{NyooomError, Result};
use crate::storage::KvStore;

#[derive(Debug, Clone)]
enum Value {
    String(String),
    Hash(HashMap<String, String>),
    List(VecDeque<String>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Hash(_) => "hash",
            Value::List(_) => "list",
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

fn wrong_type(key: &str, expected: &str, found: &Value) -> NyooomError {
    NyooomError::store_operation(format!(
        "WRONGTYPE key '{}' holds a {} value, expected {}",
        key,
        found.type_name(),
        expected
    ))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys, mostly useful in tests.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 读取时顺便清理过期的 key
    fn live_entry<'a>(map: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if map.get(key).is_some_and(|e| e.is_expired(now)) {
            map.remove(key);
        }
        map.get_mut(key)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut map = self.entries.write();
        Ok(Self::live_entry(&mut map, key).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut map = self.entries.write();
        match Self::live_entry(&mut map, key) {
            None => Ok(None),
            Some(Entry {
                value: Value::String(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(entry) => Err(wrong_type(key, "string", &entry.value)),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let entry = Entry {
            value: Value::String(value.to_string()),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut map = self.entries.write();
        let existed = Self::live_entry(&mut map, key).is_some();
        map.remove(key);
        Ok(existed)
    }

    async fn set_hash(&self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut map = self.entries.write();
        if Self::live_entry(&mut map, key).is_none() {
            map.insert(
                key.to_string(),
                Entry {
                    value: Value::Hash(HashMap::new()),
                    expires_at: None,
                },
            );
        }
        match map.get_mut(key).map(|e| &mut e.value) {
            Some(Value::Hash(hash)) => {
                for (field, value) in fields {
                    hash.insert((*field).to_string(), value.clone());
                }
                Ok(())
            }
            Some(other) => Err(wrong_type(key, "hash", other)),
            None => Err(NyooomError::store_operation("hash entry vanished")),
        }
    }

    async fn get_hash(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut map = self.entries.write();
        match Self::live_entry(&mut map, key) {
            None => Ok(HashMap::new()),
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => Ok(hash.clone()),
            Some(entry) => Err(wrong_type(key, "hash", &entry.value)),
        }
    }

    async fn increment_hash_field(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        let mut map = self.entries.write();
        if Self::live_entry(&mut map, key).is_none() {
            map.insert(
                key.to_string(),
                Entry {
                    value: Value::Hash(HashMap::new()),
                    expires_at: None,
                },
            );
        }
        match map.get_mut(key).map(|e| &mut e.value) {
            Some(Value::Hash(hash)) => {
                let current = match hash.get(field) {
                    Some(raw) => raw.parse::<i64>().map_err(|_| {
                        NyooomError::store_operation(format!(
                            "hash value at {}.{} is not an integer",
                            key, field
                        ))
                    })?,
                    None => 0,
                };
                let next = current.checked_add(delta).ok_or_else(|| {
                    NyooomError::store_operation("increment or decrement would overflow")
                })?;
                hash.insert(field.to_string(), next.to_string());
                Ok(next)
            }
            Some(other) => Err(wrong_type(key, "hash", other)),
            None => Err(NyooomError::store_operation("hash entry vanished")),
        }
    }

    async fn add_to_list(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.entries.write();
        if Self::live_entry(&mut map, key).is_none() {
            map.insert(
                key.to_string(),
                Entry {
                    value: Value::List(VecDeque::new()),
                    expires_at: None,
                },
            );
        }
        match map.get_mut(key).map(|e| &mut e.value) {
            Some(Value::List(list)) => {
                list.push_front(value.to_string());
                Ok(())
            }
            Some(other) => Err(wrong_type(key, "list", other)),
            None => Err(NyooomError::store_operation("list entry vanished")),
        }
    }

    async fn remove_from_list(&self, key: &str, value: &str) -> Result<bool> {
        let mut map = self.entries.write();
        let (removed, now_empty) = match Self::live_entry(&mut map, key) {
            None => return Ok(false),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => match list.iter().position(|v| v == value) {
                Some(index) => {
                    list.remove(index);
                    (true, list.is_empty())
                }
                None => (false, false),
            },
            Some(entry) => return Err(wrong_type(key, "list", &entry.value)),
        };
        // Redis 会删除空列表
        if now_empty {
            map.remove(key);
        }
        Ok(removed)
    }

    async fn get_list(&self, key: &str) -> Result<Vec<String>> {
        let mut map = self.entries.write();
        match Self::live_entry(&mut map, key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => Ok(list.iter().cloned().collect()),
            Some(entry) => Err(wrong_type(key, "list", &entry.value)),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
