use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::jwt::{JwtService, load_jwt_service};
use crate::config::StaticConfig;
use crate::storage::{Database, VersionCheck, create_store};

pub struct StartupContext {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtService>,
    pub config: Arc<StaticConfig>,
}

/// rediss:// 连接需要进程级的 rustls crypto provider
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// 连接存储并检查版本号（CLI 子命令也会用到）
pub async fn connect_database(config: &StaticConfig) -> Result<Arc<Database>> {
    install_crypto_provider();

    let store = create_store(&config.store)
        .await
        .context("Failed to create store backend")?;
    let db = Arc::new(Database::new(store));
    info!("Using store backend: {}", db.backend_name());

    match db
        .check_version()
        .await
        .context("Failed to check store version")?
    {
        VersionCheck::UpToDate | VersionCheck::Initialized => {}
        VersionCheck::Replaced { previous } => {
            warn!("Store was written by schema version {}", previous);
        }
    }

    Ok(db)
}

/// 准备服务器启动的上下文
/// 包括存储连接、版本检查和 JWT 密钥
pub async fn prepare_server_startup(config: Arc<StaticConfig>) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let db = connect_database(&config).await?;

    let jwt = load_jwt_service(
        &db,
        config.auth.jwt_secret.as_deref(),
        config.auth.session_minutes,
    )
    .await
    .context("Failed to load JWT secret")?;

    match db.user_exists().await {
        Ok(true) => {}
        Ok(false) => info!("No account exists yet, visit /create-account to set one up"),
        Err(e) => warn!("Could not check if account exists: {}", e),
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        db,
        jwt: Arc::new(jwt),
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    fn memory_config() -> StaticConfig {
        let mut config = StaticConfig::default();
        config.store.backend = StoreBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_prepare_writes_version_and_secret() {
        let ctx = prepare_server_startup(Arc::new(memory_config()))
            .await
            .unwrap();

        assert_eq!(
            ctx.db.get_version().await.unwrap().as_deref(),
            Some(crate::storage::SCHEMA_VERSION)
        );
        let secret = ctx.db.get_jwt_secret().await.unwrap().unwrap();
        assert_eq!(secret.len(), crate::api::constants::GENERATED_SECRET_LENGTH);

        let token = ctx.jwt.generate_session_token().unwrap();
        assert!(ctx.jwt.validate_token(&token).is_some());
    }

    #[tokio::test]
    async fn test_configured_secret_is_not_persisted() {
        let mut config = memory_config();
        config.auth.jwt_secret = Some("configured-secret".to_string());

        let ctx = prepare_server_startup(Arc::new(config)).await.unwrap();
        assert!(ctx.db.get_jwt_secret().await.unwrap().is_none());
    }
}
