//! URL 验证模块
//!
//! 规范化并验证目标 URL，阻止危险协议

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    ContainsWhitespace,
    TooShort,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidHost(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::ContainsWhitespace => write!(f, "URL cannot contain spaces"),
            Self::TooShort => write!(f, "URL is too short"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidHost(host) => write!(f, "Invalid host: {}", host),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// Shortest accepted destination, scheme excluded (`a.io` style hosts are
/// still too short to be useful).
const MIN_URL_LENGTH: usize = 5;

/// 没有协议时补全为 https://
///
/// `example.com:8080/x` 这类带端口的地址也视为缺少协议
fn with_scheme(url: &str) -> String {
    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return url.to_string();
    }
    match url.split_once(':') {
        Some((scheme, rest))
            if !scheme.contains(['.', '/'])
                && !rest.chars().next().is_some_and(|c| c.is_ascii_digit()) =>
        {
            // 显式给出了其他协议，交给后面的协议检查
            url.to_string()
        }
        _ => format!("https://{}", url),
    }
}

fn strip_scheme(url: &str) -> &str {
    let lower = url.get(..8).map(str::to_lowercase).unwrap_or_default();
    if lower.starts_with("https://") {
        &url[8..]
    } else if lower.starts_with("http://") {
        &url[7..]
    } else {
        url
    }
}

/// 验证 URL 并返回规范化后的结果
///
/// 检查项目：
/// 1. URL 不为空且不含空白字符
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://（缺省时补全 https://）
/// 4. 去掉协议后至少 5 个字符，主机名包含 `.` 或为 localhost
/// 5. URL 格式有效
pub fn normalize_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }
    if url.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::ContainsWhitespace);
    }

    let url_lower = url.to_lowercase();

    // 检查危险协议
    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    let url = with_scheme(url);
    let url_lower = url.to_lowercase();

    // 检查协议
    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    if strip_scheme(&url).chars().count() < MIN_URL_LENGTH {
        return Err(UrlValidationError::TooShort);
    }

    // 解析 URL 验证格式
    let parsed = Url::parse(&url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    let host = parsed.host_str().unwrap_or_default();
    if host != "localhost" && !host.contains('.') {
        return Err(UrlValidationError::InvalidHost(host.to_string()));
    }

    Ok(url)
}
