//! 认证相关端点：登录、会话登录、创建账户、登出

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::state::AppState;
use crate::utils::password::{MIN_PASSWORD_LENGTH, PasswordError, hash_new_password, verify_password};

use super::error_code::ErrorCode;
use super::helpers::{error_from_nyooom, error_response, json_response, redirect_response};
use super::types::{JwtForm, PasswordForm, SessionResponse};

/// 基于连接 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        // TCP peer address，无法伪造
        req.connection_info()
            .peer_addr()
            .map(str::to_string)
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

/// 创建登录限流器
///
/// 配置：每秒补充 1 个令牌，突发最多 5 次请求
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// Issue a session cookie carrying a fresh token.
fn session_response(state: &AppState, status: StatusCode, message: &str) -> HttpResponse {
    let token = match state.jwt.generate_session_token() {
        Ok(token) => token,
        Err(e) => return error_from_nyooom("Failed to generate session token", &e),
    };

    let expires_at = chrono::Utc::now() + state.jwt.login_duration();
    let mut response = json_response(
        status,
        ErrorCode::Success,
        message,
        Some(SessionResponse { expires_at }),
    );
    if let Err(e) = response.add_cookie(&state.cookies.build_session_cookie(token)) {
        error!("Failed to set session cookie: {}", e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Failed to set session cookie",
        );
    }
    response
}

/// POST /api/login
pub async fn login(state: web::Data<AppState>, form: web::Form<PasswordForm>) -> HttpResponse {
    let stored_hash = match state.db.get_user().await {
        Ok(Some(hash)) => hash,
        Ok(None) => {
            info!("Login attempted but no account exists");
            return redirect_response(StatusCode::TEMPORARY_REDIRECT, "/create-account");
        }
        Err(e) => return error_from_nyooom("Could not check if account exists", &e),
    };

    if form.password.is_empty() {
        warn!("Login failed: password field is blank or missing");
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Password is required",
        );
    }

    match verify_password(&form.password, &stored_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Login failed: incorrect password");
            return error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::AuthFailed,
                "Incorrect password",
            );
        }
        Err(e) => {
            error!("Could not validate password: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Could not validate password",
            );
        }
    }

    info!("Login successful");
    session_response(&state, StatusCode::OK, "Logged in")
}

/// POST /api/jwt-login
pub async fn jwt_login(state: web::Data<AppState>, form: web::Form<JwtForm>) -> HttpResponse {
    let token = form.jwt.trim();
    if token.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Session token is required",
        );
    }

    if state.jwt.validate_token(token).is_none() {
        warn!("Session token login rejected");
        return error_response(
            StatusCode::NOT_ACCEPTABLE,
            ErrorCode::TokenInvalid,
            "Bad session token",
        );
    }

    redirect_response(StatusCode::TEMPORARY_REDIRECT, "/dashboard")
}

/// POST /api/create-account
pub async fn create_account(
    state: web::Data<AppState>,
    form: web::Form<PasswordForm>,
) -> HttpResponse {
    match state.db.user_exists().await {
        Ok(true) => {
            warn!("Account creation rejected: account already exists");
            return error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::AccountExists,
                "Account already exists",
            );
        }
        Ok(false) => {}
        Err(e) => return error_from_nyooom("Failed to check if account exists", &e),
    }

    if form.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Password is required",
        );
    }

    let hash = match hash_new_password(&form.password) {
        Ok(hash) => hash,
        Err(PasswordError::TooShort(_)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                &format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }
        Err(e) => {
            error!("Failed to hash new password: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to hash new password",
            );
        }
    };

    if let Err(e) = state.db.set_user(&hash).await {
        return error_from_nyooom("Failed to create account", &e);
    }

    info!("Account created");
    session_response(&state, StatusCode::CREATED, "Account created")
}

/// POST /api/logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut response = json_response::<()>(StatusCode::OK, ErrorCode::Success, "Logged out", None);
    if let Err(e) = response.add_cookie(&state.cookies.build_expired_session_cookie()) {
        error!("Failed to clear session cookie: {}", e);
    }
    info!("Logged out");
    response
}
