//! 密码哈希工具模块
//!
//! 使用 Argon2id 算法进行密码哈希和验证

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Shortest password accepted when creating or resetting the account.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// 密码哈希错误
#[derive(Debug)]
pub enum PasswordError {
    TooShort(usize),
    HashError(String),
    VerifyError(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort(min) => write!(f, "Password must be at least {} characters", min),
            Self::HashError(msg) => write!(f, "Password hash error: {}", msg),
            Self::VerifyError(msg) => write!(f, "Password verify error: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

impl From<PasswordError> for crate::errors::NyooomError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort(_) => Self::validation(err.to_string()),
            _ => Self::password_hash(err.to_string()),
        }
    }
}

/// 对密码进行 Argon2id 哈希
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// 验证密码是否匹配哈希
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::VerifyError(e.to_string()))?;

    // 只有密码不匹配返回 false，其他错误（如旧的 bcrypt 哈希）向上传递
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// 检查长度后再哈希，用于新建账户和重置密码
pub fn hash_new_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LENGTH));
    }
    hash_password(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_BCRYPT_HASH: &str =
        "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

    #[test]
    fn test_hash_and_verify() {
        let password = "test_password_123";
        let hash = hash_password(password).expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong_password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = hash_password("hunter2hunter2").unwrap();
        let b = hash_password("hunter2hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(PasswordError::VerifyError(_))
        ));
        assert!(matches!(
            verify_password("whatever", LEGACY_BCRYPT_HASH),
            Err(PasswordError::VerifyError(_))
        ));
    }

    #[test]
    fn test_new_password_min_length() {
        assert!(matches!(
            hash_new_password("short"),
            Err(PasswordError::TooShort(8))
        ));
        assert!(hash_new_password("12345678").is_ok());
    }
}
