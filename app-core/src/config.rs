use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{CoreError, Result};

/// Runtime settings shared by both services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file path, or `:memory:`.
    pub database: String,
    pub log_dir: String,
    pub log_json: bool,
}

/// Shape of `<service>.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    log_dir: Option<String>,
    log_json: Option<bool>,
}

impl ServiceConfig {
    pub fn defaults(service: &str, default_port: u16) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: default_port,
            database: format!("{service}.db"),
            log_dir: "logs".to_string(),
            log_json: true,
        }
    }

    /// Defaults, then `<service>.toml` (or `$<SERVICE>_CONFIG`), then env overrides.
    pub fn load(service: &str, default_port: u16) -> Result<Self> {
        dotenv::dotenv().ok();

        let config_var = format!("{}_CONFIG", service.to_uppercase().replace('-', "_"));
        let path = env::var(&config_var)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(format!("{service}.toml")));

        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            let text = fs::read_to_string(&path).map_err(|e| {
                CoreError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(service, default_port, &text)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::defaults(service, default_port)
        };

        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml_str(service: &str, default_port: u16, text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text)?;
        let mut config = Self::defaults(service, default_port);
        if let Some(host) = file.host {
            config.host = host;
        }
        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(database) = file.database {
            config.database = database;
        }
        if let Some(log_dir) = file.log_dir {
            config.log_dir = log_dir;
        }
        if let Some(log_json) = file.log_json {
            config.log_json = log_json;
        }
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.port = port
                .parse()
                .map_err(|e| CoreError::Config(format!("Invalid PORT value '{port}': {e}")))?;
        }
        if let Ok(database) = env::var("DATABASE_URL") {
            self.database = database;
        }
        if let Ok(log_dir) = env::var("LOG_DIR") {
            self.log_dir = log_dir;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
