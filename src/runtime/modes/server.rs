//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::AppStartTime;
use crate::api::{AppState, configure_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let app_start_time = AppStartTime::default();

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let config = startup.config.clone();
    let state = web::Data::new(AppState::new(
        startup.db.clone(),
        startup.jwt.clone(),
        config.clone(),
    ));
    let app_start_time = web::Data::new(app_start_time);
    let login_rate_limit = config.auth.login_rate_limit;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} worker threads", cpu_count);
    if !login_rate_limit {
        warn!("Login rate limiting is disabled");
    }

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .app_data(state.clone())
            .app_data(app_start_time.clone())
            .app_data(web::PayloadConfig::new(64 * 1024))
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(|cfg| configure_routes(cfg, login_rate_limit))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    // 由 listen_for_shutdown 统一处理信号
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Starting server at http://{}", bind_address);
    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown: server stopped");
        }
    }

    Ok(())
}
