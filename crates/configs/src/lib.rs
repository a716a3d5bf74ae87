use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Secret used when neither `auth.jwt_secret` nor `JWT_SECRET` is provided.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Upper bound for `auth.token_ttl_secs` (ten years).
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub forms: FormsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_records_file")]
    pub records_file: String,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            records_file: default_records_file(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl StorageConfig {
    pub fn records_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.records_file)
    }

    pub fn credentials_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.credentials_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Gate `POST /api/formulario` behind a bearer token.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { required: false, jwt_secret: String::new(), token_ttl_secs: default_token_ttl() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FormsConfig {
    #[serde(default)]
    pub timestamp_format: TimestampFormat,
}

/// How `submittedAt` is written into the records file.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// RFC 3339 in UTC, millisecond precision.
    #[default]
    Iso,
    /// es-CO style local time, e.g. `15/10/2026, 2:03:07 p. m.`
    Locale,
}

impl std::str::FromStr for TimestampFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" => Ok(Self::Iso),
            "locale" => Ok(Self::Locale),
            other => Err(anyhow!("unknown timestamp format `{other}` (expected iso|locale)")),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_records_file() -> String { "formularios.json".into() }
fn default_credentials_file() -> String { "usuarios.json".into() }
fn default_token_ttl() -> u64 { 3600 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Build a config purely from environment variables, on top of defaults.
    pub fn from_env() -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        let port = std::env::var("PORT").or_else(|_| std::env::var("SERVER_PORT"));
        if let Ok(port) = port {
            cfg.server.port = port.parse().map_err(|_| anyhow!("PORT must be a number, got `{port}`"))?;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            cfg.storage.data_dir = dir;
        }
        if let Ok(v) = std::env::var("AUTH_REQUIRED") {
            cfg.auth.required = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = std::env::var("TIMESTAMP_FORMAT") {
            cfg.forms.timestamp_format = v.parse()?;
        }
        Ok(cfg)
    }

    /// Config file when present, environment otherwise; always normalized.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    /// Only a missing file falls back to the environment. A file that exists
    /// but fails to read or parse is an error.
    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env()?,
            Err(e) => return Err(e.context(format!("invalid config file `{path}`"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.records_file.trim().is_empty() || self.credentials_file.trim().is_empty() {
            return Err(anyhow!("storage file names must not be empty"));
        }
        if self.records_file == self.credentials_file {
            return Err(anyhow!("records and credentials must live in different files"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_secs == 0 || self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(anyhow!("auth.token_ttl_secs must be in 1..={MAX_TOKEN_TTL_SECS}"));
        }
        Ok(())
    }
}
