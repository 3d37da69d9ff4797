// Configuration module
use projeta_commons::config::RocksDbSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub seed: SeedSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of HTTP workers; 0 means one per CPU core
    #[serde(default)]
    pub workers: usize,
    /// Snowflake worker id baked into generated ids (0..=1023)
    #[serde(default = "default_worker_id")]
    pub worker_id: u16,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_rocksdb_path")]
    pub rocksdb_path: String,
    /// How long a roster mutation waits for a project lock before giving up
    #[serde(default = "default_lock_wait_millis")]
    pub lock_wait_millis: u64,
    #[serde(default)]
    pub rocksdb: RocksDbSettings,
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret. Override with PROJETA_JWT_SECRET in production.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issuers accepted during token validation
    #[serde(default = "default_trusted_issuers")]
    pub trusted_issuers: Vec<String>,
    /// Access token lifetime in minutes
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Per-target level overrides, e.g. { "actix_web" = "debug" }
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Empty or ["*"] allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// ["*"] allows any header
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

/// Startup seeding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSettings {
    /// Seed a demo manager, project, membership, and tasks on first start
    #[serde(default)]
    pub demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            logging: LoggingSettings::default(),
            cors: CorsSettings::default(),
            seed: SeedSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            worker_id: default_worker_id(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            rocksdb_path: default_rocksdb_path(),
            lock_wait_millis: default_lock_wait_millis(),
            rocksdb: RocksDbSettings::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            trusted_issuers: default_trusted_issuers(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            allow_credentials: false,
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self { demo: false }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_worker_id() -> u16 {
    1
}

fn default_rocksdb_path() -> String {
    "./data/rocksdb".to_string()
}

fn default_lock_wait_millis() -> u64 {
    5000
}

/// Development-only fallback. `validate()` accepts it; `lifecycle` logs a
/// loud warning when it is still in place.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_trusted_issuers() -> Vec<String> {
    vec![projeta_auth::jwt::PROJETA_ISSUER.to_string()]
}

fn default_token_ttl_minutes() -> i64 {
    projeta_auth::jwt::DEFAULT_TOKEN_TTL_MINUTES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "./logs/projeta.log".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PATCH", "DELETE", "OPTIONS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_allowed_headers() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> u64 {
    3600
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let mut config = ServerConfig::default();
            config.apply_env_overrides()?;
            config.validate()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides for sensitive configuration
    ///
    /// Supported environment variables:
    /// - PROJETA_SERVER_HOST: Override server.host
    /// - PROJETA_SERVER_PORT: Override server.port
    /// - PROJETA_DATA_DIR: Override storage.rocksdb_path
    /// - PROJETA_LOG_LEVEL: Override logging.level
    /// - PROJETA_LOG_FILE: Override logging.file_path
    /// - PROJETA_LOG_TO_CONSOLE: Override logging.log_to_console
    /// - PROJETA_JWT_SECRET: Override auth.jwt_secret
    /// - PROJETA_TOKEN_TTL_MINUTES: Override auth.token_ttl_minutes
    /// - PROJETA_SEED_DEMO: Override seed.demo
    ///
    /// Environment variables take precedence over config.toml values
    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        use std::env;

        if let Ok(host) = env::var("PROJETA_SERVER_HOST") {
            self.server.host = host;
        }

        if let Ok(port_str) = env::var("PROJETA_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid PROJETA_SERVER_PORT value: {}", port_str))?;
        }

        if let Ok(path) = env::var("PROJETA_DATA_DIR") {
            self.storage.rocksdb_path = path;
        }

        if let Ok(level) = env::var("PROJETA_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(path) = env::var("PROJETA_LOG_FILE") {
            self.logging.file_path = path;
        }

        if let Ok(val) = env::var("PROJETA_LOG_TO_CONSOLE") {
            self.logging.log_to_console =
                val.to_lowercase() == "true" || val == "1" || val.to_lowercase() == "yes";
        }

        if let Ok(secret) = env::var("PROJETA_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Ok(ttl_str) = env::var("PROJETA_TOKEN_TTL_MINUTES") {
            self.auth.token_ttl_minutes = ttl_str.parse().map_err(|_| {
                anyhow::anyhow!("Invalid PROJETA_TOKEN_TTL_MINUTES value: {}", ttl_str)
            })?;
        }

        if let Ok(val) = env::var("PROJETA_SEED_DEMO") {
            self.seed.demo =
                val.to_lowercase() == "true" || val == "1" || val.to_lowercase() == "yes";
        }

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.server.worker_id > 1023 {
            return Err(anyhow::anyhow!(
                "server.worker_id must fit in 10 bits (0..=1023), got {}",
                self.server.worker_id
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("auth.jwt_secret cannot be empty"));
        }

        if self.auth.trusted_issuers.is_empty() {
            return Err(anyhow::anyhow!("auth.trusted_issuers cannot be empty"));
        }

        if self.auth.token_ttl_minutes <= 0 {
            return Err(anyhow::anyhow!("auth.token_ttl_minutes must be positive"));
        }

        if self.storage.lock_wait_millis == 0 {
            return Err(anyhow::anyhow!("storage.lock_wait_millis cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_worker_id() {
        let mut config = ServerConfig::default();
        config.server.worker_id = 1024;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_jwt_secret_rejected() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [auth]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert_eq!(config.logging.level, "info");
        assert!(!config.seed.demo);
    }

    #[test]
    fn test_env_override_server_host() {
        env::set_var("PROJETA_SERVER_HOST", "0.0.0.0");
        let mut config = ServerConfig::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        env::remove_var("PROJETA_SERVER_HOST");
    }

    #[test]
    fn test_env_override_server_port() {
        env::set_var("PROJETA_SERVER_PORT", "9090");
        let mut config = ServerConfig::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.server.port, 9090);
        env::remove_var("PROJETA_SERVER_PORT");
    }

    #[test]
    fn test_env_override_jwt_secret() {
        env::set_var("PROJETA_JWT_SECRET", "from-env");
        let mut config = ServerConfig::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.auth.jwt_secret, "from-env");
        env::remove_var("PROJETA_JWT_SECRET");
    }

    #[test]
    fn test_env_override_seed_demo() {
        env::set_var("PROJETA_SEED_DEMO", "true");
        let mut config = ServerConfig::default();
        config.apply_env_overrides().unwrap();
        assert!(config.seed.demo);
        env::remove_var("PROJETA_SEED_DEMO");

        env::set_var("PROJETA_SEED_DEMO", "0");
        config.apply_env_overrides().unwrap();
        assert!(!config.seed.demo);
        env::remove_var("PROJETA_SEED_DEMO");
    }

    #[test]
    fn test_env_override_data_dir() {
        env::set_var("PROJETA_DATA_DIR", "/custom/data");
        let mut config = ServerConfig::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.storage.rocksdb_path, "/custom/data");
        env::remove_var("PROJETA_DATA_DIR");
    }
}
