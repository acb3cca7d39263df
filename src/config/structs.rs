use serde::{Deserialize, Serialize};

/// Cookie SameSite 策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub enum SameSitePolicy {
    #[default]
    Strict,
    Lax,
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Lax => write!(f, "Lax"),
            Self::None => write!(f, "None"),
        }
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Invalid SameSite policy: '{}'. Valid: Strict, Lax, None",
                s
            )),
        }
    }
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 优先级：旧式环境变量 > `NYOOOM__*` 环境变量 > config.toml > 默认值
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// ENV 前缀：NYOOOM，分隔符：__
    /// 示例：NYOOOM__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("NYOOOM")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.clamp_values();
        config
    }

    /// 把超出范围的值收回到可用区间
    pub fn clamp_values(&mut self) {
        use crate::services::{MAX_SLUG_LENGTH, MIN_SLUG_LENGTH};

        let len = self.links.random_slug_length;
        let clamped = len.clamp(MIN_SLUG_LENGTH, MAX_SLUG_LENGTH);
        if clamped != len {
            eprintln!(
                "[WARN] links.random_slug_length {} out of range, using {}",
                len, clamped
            );
            self.links.random_slug_length = clamped;
        }
    }

    /// Apply the flat environment variables older deployments use
    /// (`DB_ADDRESS`, `DB_PORT`, `JWT_SECRET`, ...).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(address) = lookup("DB_ADDRESS").filter(|a| !a.is_empty()) {
            self.store.address = address;
        }
        if let Some(port) = lookup("DB_PORT") {
            match port.parse() {
                Ok(port) => self.store.port = port,
                Err(e) => eprintln!("[WARN] Ignoring DB_PORT '{}': {}", port, e),
            }
        }
        if let Some(password) = lookup("DB_PASSWORD").filter(|p| !p.is_empty()) {
            self.store.password = Some(password);
        }

        if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = Some(secret);
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
        if let Some(role) = lookup("ROLE").filter(|r| !r.is_empty()) {
            self.logging.role = role;
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 对外地址，例如 `https://sho.rt`；为空时用请求的 Host 头
    #[serde(default)]
    pub public_url: Option<String>,
}

/// 键值存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_address")]
    pub address: String,
    #[serde(default = "default_store_port")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: u32,
    #[serde(default)]
    pub tls: bool,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl StoreConfig {
    /// Connection URL for the redis client. The password is percent-encoded.
    pub fn connection_url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => format!(
                "{}://:{}@{}:{}/{}",
                scheme,
                urlencoding::encode(password),
                self.address,
                self.port,
                self.database
            ),
            None => format!(
                "{}://{}:{}/{}",
                scheme, self.address, self.port, self.database
            ),
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 为空时从存储中读取，存储中也没有则自动生成
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_session_minutes")]
    pub session_minutes: u64,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default)]
    pub cookie_same_site: SameSitePolicy,
    #[serde(default = "default_true")]
    pub login_rate_limit: bool,
}

/// 短链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_random_slug_length")]
    pub random_slug_length: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
    /// 日志中标识当前实例的角色名
    #[serde(default = "default_role")]
    pub role: String,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_store_address() -> String {
    "127.0.0.1".to_string()
}

fn default_store_port() -> u16 {
    6379
}

fn default_key_prefix() -> String {
    "Nyooom:".to_string()
}

fn default_session_minutes() -> u64 {
    // 6.5 天
    (6 * 24 + 12) * 60
}

fn default_random_slug_length() -> usize {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_role() -> String {
    "nyooom".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_url: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            address: default_store_address(),
            port: default_store_port(),
            password: None,
            database: 0,
            tls: false,
            key_prefix: default_key_prefix(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            session_minutes: default_session_minutes(),
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::default(),
            login_rate_limit: true,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            random_slug_length: default_random_slug_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: true,
            role: default_role(),
        }
    }
}
