use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::api::state::AppState;

use super::error_code::ErrorCode;
use super::helpers::json_response;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl Default for AppStartTime {
    fn default() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStoreCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub store: HealthStoreCheck,
    pub response_time_ms: u64,
}

pub struct HealthService;

impl HealthService {
    /// GET /health
    pub async fn health_check(
        state: web::Data<AppState>,
        app_start_time: Option<web::Data<AppStartTime>>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = state.db.backend_name().to_string();
        let store = match tokio::time::timeout(Duration::from_secs(5), state.db.store().ping()).await
        {
            Ok(Ok(())) => HealthStoreCheck {
                status: "healthy".to_string(),
                backend,
                error: None,
            },
            Ok(Err(e)) => {
                error!("Store health check failed: {}", e);
                HealthStoreCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some(e.message().to_string()),
                }
            }
            Err(_) => {
                error!("Store health check timeout");
                HealthStoreCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let uptime = app_start_time
            .map(|t| (now - t.start_datetime).num_seconds().max(0) as u64)
            .unwrap_or_default();
        let is_healthy = store.status == "healthy";

        let health_data = HealthResponse {
            status: store.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime,
            store,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        if is_healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(health_data))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Store unavailable",
                Some(health_data),
            )
        }
    }
}
