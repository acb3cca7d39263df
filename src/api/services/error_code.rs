//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::NyooomError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    AccountExists = 2005,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalid = 3002,
    LinkDatabaseError = 3005,
}

impl From<&NyooomError> for ErrorCode {
    fn from(err: &NyooomError) -> Self {
        match err {
            NyooomError::Validation(_) => Self::LinkInvalid,
            NyooomError::NotFound(_) => Self::LinkNotFound,
            NyooomError::Conflict(_) => Self::LinkAlreadyExists,
            NyooomError::Token(_) => Self::TokenInvalid,
            NyooomError::StoreConnection(_) => Self::ServiceUnavailable,
            NyooomError::StoreOperation(_) | NyooomError::Serialization(_) => {
                Self::LinkDatabaseError
            }
            NyooomError::PasswordHash(_) | NyooomError::FileOperation(_) => {
                Self::InternalServerError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::LinkAlreadyExists).unwrap(),
            "3001"
        );
        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from(&NyooomError::conflict("taken")),
            ErrorCode::LinkAlreadyExists
        );
        assert_eq!(
            ErrorCode::from(&NyooomError::store_connection("down")),
            ErrorCode::ServiceUnavailable
        );
        assert_eq!(
            ErrorCode::from(&NyooomError::not_found("gone")),
            ErrorCode::LinkNotFound
        );
    }
}
