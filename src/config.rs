use std::str::FromStr;

use anyhow::Context;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "todo_api";
const DEFAULT_APP_NAME: &str = "todo-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown STORE_BACKEND `{}`, expected `mongodb` or `memory`", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub app_name: String,
}

impl Config {
    /// Reads the process environment, after loading `.env` when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got `{}`", port))?,
            None => DEFAULT_PORT,
        };
        let backend = match lookup("STORE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StoreBackend::MongoDb,
        };
        let mongodb_uri = lookup("MONGODB_URI").filter(|uri| !uri.trim().is_empty());
        if backend == StoreBackend::MongoDb && mongodb_uri.is_none() {
            anyhow::bail!("MONGODB_URI must be set when STORE_BACKEND is mongodb");
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            backend,
            mongodb_uri,
            database_name: lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            app_name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            backend: StoreBackend::Memory,
            mongodb_uri: None,
            database_name: DEFAULT_DATABASE.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    pub fn with_mongodb_uri(mongodb_uri: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::MongoDb,
            mongodb_uri: Some(mongodb_uri.into()),
            ..Self::in_memory()
        }
    }
}
