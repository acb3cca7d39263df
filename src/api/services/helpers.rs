//! API 帮助函数

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::constants;
use crate::config::{AuthConfig, SameSitePolicy};
use crate::errors::NyooomError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建 201 响应
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 NyooomError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 服务端错误记为 error，客户端错误记为 warn
pub fn error_from_nyooom(context: &str, err: &NyooomError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("{}: {}", context, err);
    } else {
        warn!("{}: {}", context, err);
    }
    error_response(status, ErrorCode::from(err), err.message())
}

/// `Location` 重定向响应
pub fn redirect_response(status: StatusCode, location: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::LOCATION, location))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// `<scheme>://<host>`，用于拼接短链接和二维码内容
///
/// 优先使用配置的 `public_url`，否则取请求自身的 `Host` 头。
/// 不读取 `Forwarded` / `X-Forwarded-*`。
pub fn base_url(req: &HttpRequest, public_url: Option<&str>) -> String {
    if let Some(url) = public_url
        .map(|u| u.trim().trim_end_matches('/'))
        .filter(|u| !u.is_empty())
    {
        return url.to_string();
    }

    let app_config = req.app_config();
    let scheme = if app_config.secure() { "https" } else { "http" };
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| is_plain_host(h))
        .unwrap_or_else(|| app_config.host());
    format!("{}://{}", scheme, host)
}

/// 只允许 `host[:port]` 形式的字符
fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':' | b'[' | b']'))
}

/// htmx 发起的请求会带上 `HX-Request: true`
pub fn is_htmx_request(req: &HttpRequest) -> bool {
    req.headers()
        .get("HX-Request")
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// 从 Cookie 或 Authorization header 中取出会话 token
pub fn extract_session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(constants::SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.trim().to_string())
        })
}

/// Cookie 构建器，消除重复的 cookie 创建代码
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    session_minutes: u64,
}

impl CookieBuilder {
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        let same_site = match auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: auth.cookie_secure,
            session_minutes: auth.session_minutes,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::minutes(self.session_minutes as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }
}

/// 转义 HTML 特殊字符，用于服务端渲染的片段
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
