//! API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Link;

/// 统一响应包装
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Form body of `/api/login` and `/api/create-account`
#[derive(Deserialize, Clone, Debug, Default)]
pub struct PasswordForm {
    #[serde(default)]
    pub password: String,
}

/// Form body of `/api/jwt-login`
#[derive(Deserialize, Clone, Debug, Default)]
pub struct JwtForm {
    #[serde(default)]
    pub jwt: String,
}

/// `slug` / `url` pair accepted from either the query string or a form body
#[derive(Deserialize, Clone, Debug, Default)]
pub struct CreateLinkParams {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SlugQuery {
    #[serde(default)]
    pub slug: String,
}

/// A link as returned by the API
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkResponse {
    pub slug: String,
    pub url: String,
    pub clicks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub short_url: String,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: format!("{}/{}", base_url, link.slug),
            slug: link.slug,
            url: link.url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionResponse {
    pub expires_at: DateTime<Utc>,
}
