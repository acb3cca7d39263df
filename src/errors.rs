use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum NyooomError {
    StoreConnection(String),
    StoreOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Serialization(String),
    Token(String),
    PasswordHash(String),
    FileOperation(String),
}

impl NyooomError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            NyooomError::StoreConnection(_) => "E001",
            NyooomError::StoreOperation(_) => "E002",
            NyooomError::Validation(_) => "E003",
            NyooomError::NotFound(_) => "E004",
            NyooomError::Conflict(_) => "E005",
            NyooomError::Serialization(_) => "E006",
            NyooomError::Token(_) => "E007",
            NyooomError::PasswordHash(_) => "E008",
            NyooomError::FileOperation(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            NyooomError::StoreConnection(_) => "Store Connection Error",
            NyooomError::StoreOperation(_) => "Store Operation Error",
            NyooomError::Validation(_) => "Validation Error",
            NyooomError::NotFound(_) => "Resource Not Found",
            NyooomError::Conflict(_) => "Resource Conflict",
            NyooomError::Serialization(_) => "Serialization Error",
            NyooomError::Token(_) => "Token Error",
            NyooomError::PasswordHash(_) => "Password Hash Error",
            NyooomError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            NyooomError::StoreConnection(msg)
            | NyooomError::StoreOperation(msg)
            | NyooomError::Validation(msg)
            | NyooomError::NotFound(msg)
            | NyooomError::Conflict(msg)
            | NyooomError::Serialization(msg)
            | NyooomError::Token(msg)
            | NyooomError::PasswordHash(msg)
            | NyooomError::FileOperation(msg) => msg,
        }
    }

    /// HTTP status a handler should answer with for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            NyooomError::Validation(_) => StatusCode::BAD_REQUEST,
            NyooomError::NotFound(_) => StatusCode::NOT_FOUND,
            NyooomError::Conflict(_) => StatusCode::CONFLICT,
            NyooomError::Token(_) => StatusCode::UNAUTHORIZED,
            NyooomError::StoreConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            NyooomError::StoreOperation(_)
            | NyooomError::Serialization(_)
            | NyooomError::PasswordHash(_)
            | NyooomError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时直接打印到终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for NyooomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for NyooomError {}

// 便捷的构造函数
impl NyooomError {
    pub fn store_connection<T: Into<String>>(msg: T) -> Self {
        NyooomError::StoreConnection(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        NyooomError::StoreOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        NyooomError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        NyooomError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        NyooomError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        NyooomError::Serialization(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        NyooomError::Token(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        NyooomError::PasswordHash(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        NyooomError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<redis::RedisError> for NyooomError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
            NyooomError::StoreConnection(err.to_string())
        } else {
            NyooomError::StoreOperation(err.to_string())
        }
    }
}

impl From<jsonwebtoken::errors::Error> for NyooomError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        NyooomError::Token(err.to_string())
    }
}

impl From<std::io::Error> for NyooomError {
    fn from(err: std::io::Error) -> Self {
        NyooomError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for NyooomError {
    fn from(err: serde_json::Error) -> Self {
        NyooomError::Serialization(err.to_string())
    }
}

impl From<std::num::ParseIntError> for NyooomError {
    fn from(err: std::num::ParseIntError) -> Self {
        NyooomError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NyooomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            NyooomError::store_connection("x"),
            NyooomError::store_operation("x"),
            NyooomError::validation("x"),
            NyooomError::not_found("x"),
            NyooomError::conflict("x"),
            NyooomError::serialization("x"),
            NyooomError::token("x"),
            NyooomError::password_hash("x"),
            NyooomError::file_operation("x"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            NyooomError::validation("bad slug").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NyooomError::conflict("taken").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            NyooomError::not_found("gone").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            NyooomError::store_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = NyooomError::conflict("Link abc already exists");
        assert_eq!(err.to_string(), "Resource Conflict: Link abc already exists");
        assert_eq!(err.message(), "Link abc already exists");
    }

    #[test]
    fn test_from_parse_int_error() {
        let err: NyooomError = "abc".parse::<u64>().unwrap_err().into();
        assert!(matches!(err, NyooomError::Serialization(_)));
    }
}
