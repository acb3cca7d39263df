//! 集成测试共享工具

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::web;
use serde_json::Value;

use nyooom::api::AppState;
use nyooom::api::constants::SESSION_COOKIE_NAME;
use nyooom::api::jwt::JwtService;
use nyooom::config::StaticConfig;
use nyooom::storage::{Database, MemoryStore};
use nyooom::utils::password::hash_password;

pub const TEST_SECRET: &str = "integration_test_secret_32_bytes";
pub const TEST_PASSWORD: &str = "correct horse battery";

pub fn test_state() -> web::Data<AppState> {
    state_with_config(StaticConfig::default())
}

pub fn state_with_config(config: StaticConfig) -> web::Data<AppState> {
    let db = Arc::new(Database::new(Arc::new(MemoryStore::new())));
    let config = Arc::new(config);
    let jwt = Arc::new(JwtService::new(TEST_SECRET, config.auth.session_minutes));
    web::Data::new(AppState::new(db, jwt, config))
}

/// State with an account already created
pub async fn state_with_account() -> web::Data<AppState> {
    let state = test_state();
    let hash = hash_password(TEST_PASSWORD).unwrap();
    state.db.set_user(&hash).await.unwrap();
    state
}

pub fn session_cookie(state: &AppState) -> Cookie<'static> {
    let token = state.jwt.generate_session_token().unwrap();
    Cookie::new(SESSION_COOKIE_NAME, token)
}

/// Build the app with rate limiting off (test requests carry no peer address)
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(|cfg| nyooom::api::configure_routes(cfg, false)),
        )
        .await
    };
}

pub fn code_of(body: &Value) -> i64 {
    body["code"].as_i64().unwrap()
}

/// Store whose every command fails, for exercising error paths
pub struct FailingStore;

fn down<T>() -> nyooom::errors::Result<T> {
    Err(nyooom::errors::NyooomError::store_connection(
        "Connection refused",
    ))
}

#[async_trait::async_trait]
impl nyooom::storage::KvStore for FailingStore {
    async fn exists(&self, _key: &str) -> nyooom::errors::Result<bool> {
        down()
    }
    async fn get(&self, _key: &str) -> nyooom::errors::Result<Option<String>> {
        down()
    }
    async fn set(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Option<std::time::Duration>,
    ) -> nyooom::errors::Result<()> {
        down()
    }
    async fn delete(&self, _key: &str) -> nyooom::errors::Result<bool> {
        down()
    }
    async fn set_hash(&self, _key: &str, _fields: &[(&str, String)]) -> nyooom::errors::Result<()> {
        down()
    }
    async fn get_hash(
        &self,
        _key: &str,
    ) -> nyooom::errors::Result<std::collections::HashMap<String, String>> {
        down()
    }
    async fn increment_hash_field(
        &self,
        _key: &str,
        _field: &str,
        _delta: i64,
    ) -> nyooom::errors::Result<i64> {
        down()
    }
    async fn add_to_list(&self, _key: &str, _value: &str) -> nyooom::errors::Result<()> {
        down()
    }
    async fn remove_from_list(&self, _key: &str, _value: &str) -> nyooom::errors::Result<bool> {
        down()
    }
    async fn get_list(&self, _key: &str) -> nyooom::errors::Result<Vec<String>> {
        down()
    }
    async fn ping(&self) -> nyooom::errors::Result<()> {
        down()
    }
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

pub fn failing_state() -> web::Data<AppState> {
    let db = Arc::new(Database::new(Arc::new(FailingStore)));
    let config = Arc::new(StaticConfig::default());
    let jwt = Arc::new(JwtService::new(TEST_SECRET, config.auth.session_minutes));
    web::Data::new(AppState::new(db, jwt, config))
}
