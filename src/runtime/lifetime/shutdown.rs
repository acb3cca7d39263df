use tokio::signal;
use tracing::{info, warn};

/// 等待 Ctrl+C / SIGTERM
///
/// 返回后由调用方停止 HTTP server，进行中的请求会被排空
pub async fn listen_for_shutdown() {
    wait_for_signal().await;
    info!("Shutdown signal received");
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal as unix_signal};

    let mut sigterm = match unix_signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {}", e);
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        );
    }
}
