use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub listings: ListingsConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Upper bound for multipart bodies (image uploads included).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_max_body_bytes() -> usize { 10 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Cloudinary credentials. All three must be present for uploads to work.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self { cloud_name: None, api_key: None, api_secret: None, base_url: default_media_base_url() }
    }
}

fn default_media_base_url() -> String { "https://api.cloudinary.com".into() }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListingsConfig {
    /// When false (the default) an update without a new image file clears
    /// the stored image.
    #[serde(default)]
    pub preserve_image_on_update: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_base_url")]
    pub base_url: String,
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: default_client_base_url(), timeout_secs: default_client_timeout() }
    }
}

fn default_client_base_url() -> String { "http://127.0.0.1:8080".into() }
fn default_client_timeout() -> u64 { 15 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
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
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when
    /// the file is missing, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
                _ => return Err(e),
            },
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.media.normalize_from_env();
        self.client.normalize_from_env();
        self.client.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.max_body_bytes == 0 {
            self.max_body_bytes = default_max_body_bytes();
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl MediaConfig {
    pub fn normalize_from_env(&mut self) {
        fill_from_env(&mut self.cloud_name, "CLOUD_NAME");
        fill_from_env(&mut self.api_key, "CLOUDINARY_KEY");
        fill_from_env(&mut self.api_secret, "CLOUDINARY_SECRET");
    }

    /// Returns `(cloud_name, api_key, api_secret)` when every credential is set.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        Some((non_empty(&self.cloud_name)?, non_empty(&self.api_key)?, non_empty(&self.api_secret)?))
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    let missing = slot.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true);
    if missing {
        if let Ok(v) = std::env::var(var) {
            *slot = Some(v);
        }
    }
}

impl ClientConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("DASHBOARD_BASE_URL") {
            if !url.trim().is_empty() { self.base_url = url; }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!("client.base_url must start with http(s)"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("client.timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.media.base_url, "https://api.cloudinary.com");
        assert!(!cfg.listings.preserve_image_on_update);
        assert_eq!(cfg.client.timeout_secs, 15);
    }

    #[test]
    fn sections_are_parsed() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 1
            min_connections = 1

            [media]
            cloud_name = "demo"
            api_key = "key"
            api_secret = "secret"

            [listings]
            preserve_image_on_update = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.media.credentials(), Some(("demo", "key", "secret")));
        assert!(cfg.listings.preserve_image_on_update);
    }

    #[test]
    fn database_url_scheme_is_checked() {
        let mut db = DatabaseConfig { url: "mysql://localhost/db".into(), ..Default::default() };
        assert!(db.validate().is_err());
        db.url = "postgres://localhost/db".into();
        assert!(db.validate().is_ok());
        db.url = "sqlite::memory:".into();
        assert!(db.validate().is_ok());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let db = DatabaseConfig { url: "sqlite::memory:".into(), min_connections: 5, max_connections: 2, ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn partial_media_credentials_are_not_usable() {
        let media = MediaConfig { cloud_name: Some("demo".into()), api_key: Some("".into()), ..Default::default() };
        assert!(media.credentials().is_none());
    }

    #[test]
    fn complete_media_credentials_are_returned_in_order() {
        let media = MediaConfig {
            cloud_name: Some("demo".into()),
            api_key: Some("key".into()),
            api_secret: Some("secret".into()),
            ..Default::default()
        };
        assert_eq!(media.credentials(), Some(("demo", "key", "secret")));
        let blank_secret = MediaConfig { api_secret: Some("   ".into()), ..media };
        assert!(blank_secret.credentials().is_none());
    }

    #[test]
    fn zero_worker_threads_falls_back() {
        let mut server = ServerConfig { worker_threads: Some(0), ..Default::default() };
        server.normalize().unwrap();
        assert_eq!(server.worker_threads, Some(4));
    }
}
