//! API 模块常量定义
//!
//! 包含认证、Cookie 等相关的硬编码常量。

/// Session Token Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "nyooom-session-token";

/// Session token `iss` claim
pub const TOKEN_ISSUER: &str = "Backend API";

/// Session token `sub` claim
pub const TOKEN_SUBJECT: &str = "Session Token";

/// Length of a generated signing secret
pub const GENERATED_SECRET_LENGTH: usize = 48;
