use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Connection URL. `postgres://` and `sqlite://` are supported.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Insert the default subject list into an empty database on startup.
    #[serde(default = "default_seed_subjects")]
    pub seed_subjects: bool,
    /// Log every SQL statement at debug level.
    #[serde(default)]
    pub log_statements: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

fn default_allow_origins() -> Vec<String> {
    vec!["http://localhost:4200".into()]
}
fn default_cors_max_age() -> u64 {
    3600
}
fn default_max_connections() -> u32 {
    10
}
fn default_seed_subjects() -> bool {
    true
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: default_allow_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "sqlite://exams.db?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., EXAMS__DATABASE__URL)
            .add_source(Environment::with_prefix("EXAMS").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
