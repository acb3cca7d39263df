pub mod password;
pub mod url_validator;

/// 不含易混淆字符（0/O、l/I）的字符集，用于 slug 和密钥
const READABLE_CHARSET: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ123456789";

pub fn generate_random_string(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| READABLE_CHARSET[rand::random_range(0..READABLE_CHARSET.len())] as char)
        .take(length)
        .collect()
}

/// Random secret material for signing session tokens.
pub fn generate_secure_token(length: usize) -> String {
    generate_random_string(length)
}
