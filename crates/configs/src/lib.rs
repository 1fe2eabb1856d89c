use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
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
        Self { host: "0.0.0.0".into(), port: 5002, worker_threads: Some(4) }
    }
}

/// Origins allowed to call `/api/*`. `"*"` means any origin.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: default_origins() }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o.trim() == "*")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_true")]
    pub seed: bool,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { seed: true, id_strategy: IdStrategy::default() }
    }
}

/// How the store picks the id of a newly created post.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `max(existing ids) + 1`; an id freed by deleting the newest post is handed out again.
    #[default]
    MaxPlusOne,
    /// Never reissues an id within the lifetime of the process.
    Monotonic,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if one can be read, otherwise defaults overlaid with
    /// `SERVER_HOST`, `SERVER_PORT` and `TOKIO_WORKER_THREADS`.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        let threads = std::env::var("TOKIO_WORKER_THREADS").ok();
        if let Some(w) = threads.and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.cors.normalize();
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads.unwrap_or(0) == 0 {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl CorsConfig {
    fn normalize(&mut self) {
        self.allowed_origins.retain(|o| !o.trim().is_empty());
        if self.allowed_origins.is_empty() {
            self.allowed_origins = default_origins();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let mut cfg = from_toml_str("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 5002);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(cfg.cors.allows_any());
        assert!(cfg.docs.enabled);
        assert!(cfg.store.seed);
        assert_eq!(cfg.store.id_strategy, IdStrategy::MaxPlusOne);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parses_full_file() {
        let cfg = from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8088
            worker_threads = 2

            [cors]
            allowed_origins = ["http://localhost:3000"]

            [docs]
            enabled = false

            [store]
            seed = false
            id_strategy = "monotonic"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8088");
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert!(!cfg.cors.allows_any());
        assert!(!cfg.docs.enabled);
        assert!(!cfg.store.seed);
        assert_eq!(cfg.store.id_strategy, IdStrategy::Monotonic);
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn unknown_id_strategy_is_rejected() {
        assert!(from_toml_str("[store]\nid_strategy = \"random\"").is_err());
    }

    #[test]
    fn normalize_fixes_host_threads_and_origins() {
        let mut cfg = from_toml_str(
            r#"
            [server]
            host = " "
            port = 9000
            worker_threads = 0

            [cors]
            allowed_origins = [""]
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.cors.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn port_zero_is_rejected() {
        let mut cfg = from_toml_str("[server]\nhost = \"localhost\"\nport = 0").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn missing_file_is_detected() {
        let err = load_from_file("/nonexistent-config-for-tests.toml").unwrap_err();
        assert!(is_missing_file(&err));
    }
}
